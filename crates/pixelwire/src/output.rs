use std::io::{IsTerminal, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use pixelwire::frame::{opcode_name, EffectCommand, Frame, ProtocolRevision};
use pixelwire::session::{SendOutcome, Status};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    /// Frame bytes only, for piping into a device. Other output falls back
    /// to `pretty`.
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

/// One encoded frame, optionally with where it went.
#[derive(Serialize)]
pub struct FrameReport<'a> {
    effect: &'static str,
    opcode: u8,
    opcode_name: &'static str,
    revision: &'static str,
    length: usize,
    bytes: &'a [u8],
    hex: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    device: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    outcome: Option<&'static str>,
}

impl<'a> FrameReport<'a> {
    pub fn new(command: &EffectCommand, frame: &'a Frame, revision: ProtocolRevision) -> Self {
        Self {
            effect: command.name(),
            opcode: frame.opcode(),
            opcode_name: opcode_name(frame.opcode()),
            revision: revision.as_str(),
            length: frame.len(),
            bytes: frame.as_bytes(),
            hex: hex(frame.as_bytes()),
            device: None,
            outcome: None,
        }
    }

    pub fn delivered(mut self, device: Option<&'a str>, outcome: SendOutcome) -> Self {
        self.device = device;
        self.outcome = Some(match outcome {
            SendOutcome::Sent => "sent",
            SendOutcome::Dropped => "dropped",
        });
        self
    }
}

pub fn print_frame(report: &FrameReport<'_>, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(report),
        OutputFormat::Table => {
            let mut header = vec!["EFFECT", "OPCODE", "REV", "LEN", "BYTES"];
            let mut row = vec![
                report.effect.to_string(),
                format!("0x{:02X} {}", report.opcode, report.opcode_name),
                report.revision.to_string(),
                report.length.to_string(),
                report.hex.clone(),
            ];
            if let Some(outcome) = report.outcome {
                header.extend(["DEVICE", "OUTCOME"]);
                row.push(report.device.unwrap_or("-").to_string());
                row.push(outcome.to_string());
            }
            print_table(header, vec![row]);
        }
        OutputFormat::Pretty => {
            let mut line = format!(
                "effect={} opcode=0x{:02X} rev={} len={} bytes=[{}]",
                report.effect, report.opcode, report.revision, report.length, report.hex
            );
            if let Some(outcome) = report.outcome {
                line.push_str(&format!(
                    " device={} outcome={outcome}",
                    report.device.unwrap_or("-")
                ));
            }
            println!("{line}");
        }
        OutputFormat::Raw => print_raw(report.bytes),
    }
}

#[derive(Serialize)]
struct StatusOutput<'a> {
    #[serde(flatten)]
    status: &'a Status,
    code: u8,
    timestamp: String,
}

pub fn print_status(status: &Status, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&StatusOutput {
            status,
            code: status.code(),
            timestamp: now_unix_seconds(),
        }),
        OutputFormat::Table => print_table(
            vec!["STATE", "DEVICE", "MESSAGE"],
            vec![vec![
                status.state.as_str().to_string(),
                status.device.clone().unwrap_or_else(|| "-".to_string()),
                status.message.clone(),
            ]],
        ),
        OutputFormat::Pretty | OutputFormat::Raw => println!(
            "state={} device={} message={}",
            status.state.as_str(),
            status.device.as_deref().unwrap_or("-"),
            status.message
        ),
    }
}

#[derive(Serialize)]
struct NameOutput {
    kind: &'static str,
    name: &'static str,
    token: &'static str,
}

/// `(kind, name, token)` rows: rings first, then colors.
pub fn print_names(rows: &[(&'static str, &'static str, &'static str)], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out: Vec<NameOutput> = rows
                .iter()
                .map(|&(kind, name, token)| NameOutput { kind, name, token })
                .collect();
            print_json(&out);
        }
        OutputFormat::Table => print_table(
            vec!["KIND", "NAME", "TOKEN"],
            rows.iter()
                .map(|(kind, name, token)| vec![kind.to_string(), name.to_string(), token.to_string()])
                .collect(),
        ),
        OutputFormat::Pretty | OutputFormat::Raw => {
            for (kind, name, token) in rows {
                println!("{kind}\t{name}\t{token}");
            }
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

fn print_table(header: Vec<&str>, rows: Vec<Vec<String>>) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    for row in rows {
        table.add_row(row);
    }
    println!("{table}");
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn now_unix_seconds() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string())
}
