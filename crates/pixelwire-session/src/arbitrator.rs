use std::collections::VecDeque;

use pixelwire_frame::{EffectCommand, Frame};
use tracing::{debug, info, warn};

use crate::config::SessionConfig;
use crate::device::CandidateDevice;
use crate::error::{Result, SendOutcome};
use crate::session::{Liveness, Session};
use crate::status::Status;

/// Result of one arbitrator tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// No session is active.
    Idle,
    Alive,
    Probed {
        failures: u32,
    },
    /// The active session was lost. `next` names the device that took over,
    /// if any candidate could be opened.
    Lost {
        device: String,
        next: Option<String>,
    },
}

/// Keeps the queue of candidate devices and at most one active session.
///
/// Candidates are tried in registration order, each at most once per
/// registration.
pub struct Arbitrator {
    config: SessionConfig,
    pending: VecDeque<CandidateDevice>,
    active: Option<Session>,
    next_generation: u64,
    sessions_lost: u64,
}

impl Arbitrator {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            pending: VecDeque::new(),
            active: None,
            next_generation: 1,
            sessions_lost: 0,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Offer a discovered device.
    ///
    /// Denylisted identifiers are dropped. When no session is active, the
    /// queue is drained until one candidate opens.
    pub fn register(&mut self, candidate: CandidateDevice) {
        if self.config.is_denied(candidate.id()) {
            warn!(device = candidate.id(), "ignoring denylisted device");
            return;
        }
        debug!(device = candidate.id(), queued = self.pending.len() + 1, "candidate registered");
        self.pending.push_back(candidate);
        self.advance();
    }

    /// Drop the active session, if any, and move on to the next candidate.
    pub fn on_session_lost(&mut self) {
        if let Some(mut session) = self.active.take() {
            session.close();
            self.sessions_lost += 1;
            info!(device = session.device_id(), remaining = self.pending.len(), "session lost");
        }
        self.advance();
    }

    /// Run one liveness tick on the active session.
    pub fn tick(&mut self) -> TickOutcome {
        let Some(session) = self.active.as_mut() else {
            return TickOutcome::Idle;
        };

        match session.tick() {
            Liveness::Alive => TickOutcome::Alive,
            Liveness::Probed { failures } => TickOutcome::Probed { failures },
            Liveness::Lost => {
                let device = session.device_id().to_string();
                self.on_session_lost();
                TickOutcome::Lost {
                    device,
                    next: self.active_device().map(str::to_string),
                }
            }
        }
    }

    /// Encode and send a command to the active session.
    ///
    /// With no active session the frame is dropped; that is not an error.
    pub fn send(&mut self, command: &EffectCommand) -> Result<SendOutcome> {
        let frame = Frame::encode(command, self.config.revision)?;
        Ok(self.send_frame(&frame))
    }

    /// Send an already encoded frame to the active session.
    pub fn send_frame(&mut self, frame: &Frame) -> SendOutcome {
        match self.active.as_mut() {
            Some(session) => session.send(frame),
            None => {
                debug!(opcode = frame.opcode(), "no active session; frame dropped");
                SendOutcome::Dropped
            }
        }
    }

    pub fn status(&self) -> Status {
        match &self.active {
            Some(session) => Status::connected(session.device_id()),
            None => Status::disconnected(),
        }
    }

    /// Turn the pixels off, close the active session and forget every
    /// pending candidate. Safe to call at any time, any number of times.
    pub fn shutdown(&mut self) {
        if let Some(mut session) = self.active.take() {
            let all_off = EffectCommand::all_off(self.config.all_off_range);
            match Frame::encode(&all_off, self.config.revision) {
                Ok(frame) => {
                    session.send(&frame);
                }
                Err(err) => warn!(error = %err, "could not encode all-off frame"),
            }
            session.close();
            info!(device = session.device_id(), "shut down");
        }
        self.pending.clear();
    }

    pub fn active_device(&self) -> Option<&str> {
        self.active.as_ref().map(Session::device_id)
    }

    /// Generation of the active session; changes whenever a new one opens.
    pub fn active_generation(&self) -> Option<u64> {
        self.active.as_ref().map(Session::generation)
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Number of sessions ended by liveness loss.
    pub fn sessions_lost(&self) -> u64 {
        self.sessions_lost
    }

    fn advance(&mut self) {
        while self.active.is_none() {
            let Some(candidate) = self.pending.pop_front() else {
                debug!("no candidates left; staying disconnected");
                return;
            };

            let id = candidate.id().to_string();
            let generation = self.next_generation;
            self.next_generation += 1;

            match Session::open(candidate, generation, &self.config) {
                Ok(session) => self.active = Some(session),
                Err(err) => warn!(device = %id, error = %err, "candidate failed to open"),
            }
        }
    }
}

impl std::fmt::Debug for Arbitrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Arbitrator")
            .field("active", &self.active)
            .field("pending", &self.pending)
            .field("sessions_lost", &self.sessions_lost)
            .finish()
    }
}
