/// Per-run counters returned by both drivers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    pub entries: u64,
    pub skipped: u64,
    pub crc_mismatches: u64,
    pub payload_bytes: u64,
}

impl Stats {
    pub(crate) fn record(&mut self, outcome: &crate::error::EntryOutcome) {
        use crate::error::EntryOutcome;
        match outcome {
            EntryOutcome::Written { size } => {
                self.entries += 1;
                self.payload_bytes += size;
            }
            EntryOutcome::ChecksumMismatch { size, .. } => {
                self.entries += 1;
                self.crc_mismatches += 1;
                self.payload_bytes += size;
            }
            EntryOutcome::Skipped(_) => self.skipped += 1,
        }
    }
}
