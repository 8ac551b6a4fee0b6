//! Hand-assembled Standard MIDI Files for unit tests.

pub struct TrackBuilder {
    data: Vec<u8>,
}

impl TrackBuilder {
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.data.extend_from_slice(&[0x00, 0xFF, 0x03, name.len() as u8]);
        self.data.extend_from_slice(name.as_bytes());
        self
    }

    pub fn tempo_120(mut self) -> Self {
        self.data
            .extend_from_slice(&[0x00, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20]);
        self
    }

    pub fn program(mut self, channel: u8, program: u8) -> Self {
        self.data.extend_from_slice(&[0x00, 0xC0 | channel, program]);
        self
    }

    /// Note on immediately, note off `ticks` later.
    pub fn note(mut self, channel: u8, pitch: u8, ticks: u32) -> Self {
        self.data.extend_from_slice(&[0x00, 0x90 | channel, pitch, 100]);
        write_vlq(&mut self.data, ticks);
        self.data.extend_from_slice(&[0x80 | channel, pitch, 0]);
        self
    }

    /// Note on with no matching note off.
    pub fn dangling(mut self, channel: u8, pitch: u8) -> Self {
        self.data.extend_from_slice(&[0x00, 0x90 | channel, pitch, 100]);
        self
    }

    pub fn rest(mut self, ticks: u32) -> Self {
        // Zero-length text event carries the delta
        write_vlq(&mut self.data, ticks);
        self.data.extend_from_slice(&[0xFF, 0x01, 0x00]);
        self
    }

    pub fn build(mut self) -> Vec<u8> {
        self.data.extend_from_slice(&[0x00, 0xFF, 0x2F, 0x00]);
        self.data
    }
}

/// Format-1 file at 480 PPQ.
pub fn smf(tracks: &[Vec<u8>]) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend_from_slice(b"MThd");
    buf.extend_from_slice(&6u32.to_be_bytes());
    buf.extend_from_slice(&1u16.to_be_bytes());
    buf.extend_from_slice(&(tracks.len() as u16).to_be_bytes());
    buf.extend_from_slice(&480u16.to_be_bytes());

    for track in tracks {
        buf.extend_from_slice(b"MTrk");
        buf.extend_from_slice(&(track.len() as u32).to_be_bytes());
        buf.extend_from_slice(track);
    }

    buf
}

fn write_vlq(buf: &mut Vec<u8>, mut value: u32) {
    let mut bytes = vec![(value & 0x7F) as u8];
    value >>= 7;
    while value > 0 {
        bytes.push(((value & 0x7F) as u8) | 0x80);
        value >>= 7;
    }
    bytes.reverse();
    buf.extend_from_slice(&bytes);
}
