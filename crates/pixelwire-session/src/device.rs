use std::fmt;

use pixelwire_transport::SerialLink;

/// A device offered to the arbitrator, not necessarily connected yet.
///
/// Owns its link; ownership moves into the [`crate::Session`] when the
/// device is selected.
pub struct CandidateDevice {
    id: String,
    link: Box<dyn SerialLink>,
}

impl CandidateDevice {
    pub fn new(id: impl Into<String>, link: impl SerialLink + 'static) -> Self {
        Self {
            id: id.into(),
            link: Box::new(link),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub(crate) fn link_mut(&mut self) -> &mut dyn SerialLink {
        self.link.as_mut()
    }
}

impl fmt::Debug for CandidateDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CandidateDevice")
            .field("id", &self.id)
            .field("open", &self.link.is_open())
            .finish()
    }
}
