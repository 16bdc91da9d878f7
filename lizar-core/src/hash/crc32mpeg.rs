//! CRC-32/MPEG-2: polynomial `0x04C11DB7`, MSB-first, seeded with
//! `0xFFFFFFFF`, no reflection and no final XOR.

pub const POLY: u32 = 0x04C1_1DB7;
pub const SEED: u32 = 0xFFFF_FFFF;

const TABLE: [u32; 256] = make_table();

const fn make_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut i = 0;
    while i < 256 {
        let mut c = (i as u32) << 24;
        let mut k = 0;
        while k < 8 {
            c = if c & 0x8000_0000 != 0 {
                (c << 1) ^ POLY
            } else {
                c << 1
            };
            k += 1;
        }
        table[i] = c;
        i += 1;
    }
    table
}

/// Folds `data` into `crc` and returns the new state. Splitting the input
/// across calls gives the same result as one call over the concatenation.
pub fn crc32mpeg(crc: u32, data: &[u8]) -> u32 {
    data.iter().fold(crc, |c, &b| {
        (c << 8) ^ TABLE[((c >> 24) as u8 ^ b) as usize]
    })
}

/// Running checksum for one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crc32Mpeg {
    state: u32,
}

impl Default for Crc32Mpeg {
    fn default() -> Self {
        Self::new()
    }
}

impl Crc32Mpeg {
    pub fn new() -> Self {
        Self { state: SEED }
    }

    pub fn update(&mut self, data: &[u8]) {
        self.state = crc32mpeg(self.state, data);
    }

    pub fn value(&self) -> u32 {
        self.state
    }
}
