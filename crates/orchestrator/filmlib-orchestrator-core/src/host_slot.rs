use filmlib_codec_core::SceneHost;
use filmlib_library_core::{DocumentSlot, LibraryError};

/// The internal library document kept in a host text block.
pub struct HostTextSlot<'a, H: SceneHost + ?Sized> {
    host: &'a mut H,
    name: &'a str,
}

impl<'a, H: SceneHost + ?Sized> HostTextSlot<'a, H> {
    pub fn new(host: &'a mut H, name: &'a str) -> Self {
        Self { host, name }
    }
}

impl<H: SceneHost + ?Sized> DocumentSlot for HostTextSlot<'_, H> {
    fn load(&self) -> Option<String> {
        self.host.text(self.name)
    }

    fn store(&mut self, text: &str) -> Result<(), LibraryError> {
        self.host
            .write_text(self.name, text)
            .map_err(|e| LibraryError::Slot(format!("text block {}: {e}", self.name)))
    }
}
