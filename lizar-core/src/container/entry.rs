use std::io::{BufRead, Read, Write};

use crate::error::{LizError, Result};
use crate::hash::crc32mpeg::Crc32Mpeg;
use crate::util::buf::{HEADER_CAP, HeaderBuf};
use crate::util::crc_forward::CrcWriter;
use crate::util::io::{copy_exact, read_full};
use crate::util::varint;

pub const MAGIC: &[u8; 4] = b"Liz1";
pub const MAGIC_LEN: usize = MAGIC.len();
pub const CRC_LEN: u64 = 4;

pub const FLAG_EXECUTABLE: u8 = 0x01;

/// Header fields that follow the magic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryHeader {
    /// Payload length in bytes
    pub size: u64,
    /// Seconds since the Unix epoch; stored as its u64 bit pattern
    pub mtime: i64,
    pub executable: bool,
}

impl EntryHeader {
    pub fn flags(&self) -> u8 {
        if self.executable { FLAG_EXECUTABLE } else { 0 }
    }

    /// Magic, both varints and the flags byte.
    pub fn encode(&self) -> Result<HeaderBuf> {
        let mut buf = HeaderBuf::with_prefix(MAGIC)?;
        varint::put(&mut buf, self.size)?;
        varint::put(&mut buf, self.mtime as u64)?;
        buf.push(self.flags())?;
        Ok(buf)
    }

    /// Parses the fields after an already validated magic. The returned buffer
    /// holds the raw header bytes (magic included) exactly as read.
    pub fn read_after_magic<R: Read + ?Sized>(r: &mut R) -> Result<(Self, HeaderBuf)> {
        let mut buf = HeaderBuf::with_prefix(MAGIC)?;
        // keep the last slot for the flags byte
        let limit = HEADER_CAP - 1;
        varint::read_raw(r, &mut buf, limit)?;
        varint::read_raw(r, &mut buf, limit)?;
        buf.push(varint::read_byte(r)?)?;
        let (header, _) = Self::decode(buf.as_slice())?;
        Ok((header, buf))
    }

    /// Parses a complete header (magic included) from a byte slice.
    pub fn decode(bytes: &[u8]) -> Result<(Self, usize)> {
        let bytes = &bytes[..bytes.len().min(HEADER_CAP)];
        if bytes.len() < MAGIC_LEN {
            return Err(LizError::Header("truncated magic".into()));
        }
        let got: [u8; 4] = [bytes[0], bytes[1], bytes[2], bytes[3]];
        if &got != MAGIC {
            return Err(LizError::BadMagic { got });
        }
        let limit = HEADER_CAP - 1;
        let mut pos = MAGIC_LEN;
        let (size, n) = varint::decode(&bytes[pos..limit.min(bytes.len())])?;
        pos += n;
        let (mtime, n) = varint::decode(&bytes[pos..limit.min(bytes.len())])?;
        pos += n;
        let flags = *bytes
            .get(pos)
            .ok_or_else(|| LizError::Header("missing flags byte".into()))?;
        Ok((
            Self {
                size,
                mtime: mtime as i64,
                executable: flags & FLAG_EXECUTABLE != 0,
            },
            pos + 1,
        ))
    }
}

/// What the next four bytes of an archive turned out to be.
#[derive(Debug, PartialEq, Eq)]
pub enum MagicRead {
    /// Clean end of archive
    End,
    /// 1 to 3 stray bytes before end of stream
    Trailing(usize),
    Magic,
}

pub fn read_magic<R: Read + ?Sized>(r: &mut R) -> Result<MagicRead> {
    let mut got = [0u8; MAGIC_LEN];
    match read_full(r, &mut got)? {
        0 => Ok(MagicRead::End),
        MAGIC_LEN if &got == MAGIC => Ok(MagicRead::Magic),
        MAGIC_LEN => Err(LizError::BadMagic { got }),
        n => Ok(MagicRead::Trailing(n)),
    }
}

/// Reads a NUL-terminated name. The terminator is kept.
pub fn read_name<R: BufRead + ?Sized>(r: &mut R) -> Result<Vec<u8>> {
    let mut name = Vec::new();
    r.read_until(0, &mut name)?;
    if name.last() != Some(&0) {
        return Err(LizError::UnterminatedName);
    }
    Ok(name)
}

pub fn read_crc<R: Read + ?Sized>(r: &mut R) -> Result<u32> {
    let mut be = [0u8; CRC_LEN as usize];
    if read_full(r, &mut be)? != be.len() {
        return Err(LizError::UnexpectedEof("reading checksum"));
    }
    Ok(u32::from_be_bytes(be))
}

/// Writes one complete frame and returns its checksum. `payload` must yield
/// at least `header.size` bytes.
pub fn write_entry<W, R>(
    out: &mut W,
    name: &[u8],
    header: &EntryHeader,
    payload: &mut R,
    buf: &mut [u8],
) -> Result<u32>
where
    W: Write + ?Sized,
    R: Read + ?Sized,
{
    if name.contains(&0) {
        return Err(LizError::Header("file name contains a NUL byte".into()));
    }
    let hdr = header.encode()?;
    let (magic, rest) = hdr.as_slice().split_at(MAGIC_LEN);
    out.write_all(magic).map_err(LizError::write("header"))?;

    let mut w = CrcWriter::new(&mut *out);
    w.write_all(rest).map_err(LizError::write("header"))?;
    w.write_all(name).map_err(LizError::write("file name"))?;
    w.write_all(&[0]).map_err(LizError::write("file name"))?;
    copy_exact(payload, &mut w, header.size, buf, "reading file data")?;
    let crc = w.crc();

    out.write_all(&crc.to_be_bytes())
        .map_err(LizError::write("CRC"))?;
    Ok(crc)
}

/// Checksum state after the header and name, ready for the payload.
pub fn crc_after_name(header: &HeaderBuf, name_with_nul: &[u8]) -> Crc32Mpeg {
    let mut crc = Crc32Mpeg::new();
    crc.update(&header.as_slice()[MAGIC_LEN..]);
    crc.update(name_with_nul);
    crc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::crc32mpeg::{SEED, crc32mpeg};
    use std::io::Cursor;

    fn sample() -> EntryHeader {
        EntryHeader {
            size: 5,
            mtime: 1_700_000_000,
            executable: true,
        }
    }

    #[test]
    fn header_layout() {
        let hdr = sample().encode().unwrap();
        let bytes = hdr.as_slice();
        assert_eq!(&bytes[..4], b"Liz1");
        assert_eq!(bytes[4], 0x05);
        assert_eq!(*bytes.last().unwrap(), FLAG_EXECUTABLE);
        assert_eq!(EntryHeader::decode(bytes).unwrap(), (sample(), bytes.len()));
    }

    #[test]
    fn largest_header_fits() {
        let h = EntryHeader {
            size: u64::MAX,
            mtime: -1,
            executable: false,
        };
        let hdr = h.encode().unwrap();
        assert_eq!(hdr.len(), 4 + 10 + 10 + 1);
        let (back, _) = EntryHeader::decode(hdr.as_slice()).unwrap();
        assert_eq!(back, h);
    }

    #[test]
    fn reserved_flag_bits_are_ignored() {
        let mut raw = b"Liz1".to_vec();
        raw.extend_from_slice(&[0x00, 0x00, 0xFE]);
        let (h, _) = EntryHeader::read_after_magic(&mut Cursor::new(&raw[4..])).unwrap();
        assert!(!h.executable);
        raw[6] = 0xFF;
        let (h, _) = EntryHeader::decode(&raw).unwrap();
        assert!(h.executable);
    }

    #[test]
    fn overlong_header_is_rejected() {
        // two varints of 14 continuation bytes each cannot fit in 27 bytes
        let raw = vec![0x80u8; 40];
        assert!(matches!(
            EntryHeader::read_after_magic(&mut Cursor::new(raw)),
            Err(LizError::Header(_))
        ));
    }

    #[test]
    fn overflowing_size_is_rejected() {
        let mut raw = vec![0xFF; 9];
        raw.extend_from_slice(&[0x02, 0x00, 0x00]);
        assert!(matches!(
            EntryHeader::read_after_magic(&mut Cursor::new(raw)),
            Err(LizError::Header(_))
        ));
    }

    #[test]
    fn frame_bytes_and_checksum() {
        let mut out = Vec::new();
        let mut buf = [0u8; 2];
        let crc = write_entry(&mut out, b"a.txt", &sample(), &mut &b"hello"[..], &mut buf).unwrap();

        let hdr = sample().encode().unwrap();
        let mut expected = hdr.as_slice().to_vec();
        expected.extend_from_slice(b"a.txt\0hello");
        let want = crc32mpeg(SEED, &expected[4..]);
        assert_eq!(crc, want);
        expected.extend_from_slice(&want.to_be_bytes());
        assert_eq!(out, expected);

        let mut r = Cursor::new(out);
        assert_eq!(read_magic(&mut r).unwrap(), MagicRead::Magic);
        let (h, raw) = EntryHeader::read_after_magic(&mut r).unwrap();
        assert_eq!(h, sample());
        let name = read_name(&mut r).unwrap();
        assert_eq!(name, b"a.txt\0");
        let mut state = crc_after_name(&raw, &name);
        let mut payload = [0u8; 5];
        r.read_exact(&mut payload).unwrap();
        state.update(&payload);
        assert_eq!(read_crc(&mut r).unwrap(), state.value());
        assert_eq!(read_magic(&mut r).unwrap(), MagicRead::End);
    }

    #[test]
    fn short_payload_is_fatal() {
        let mut out = Vec::new();
        let mut buf = [0u8; 8];
        let err = write_entry(&mut out, b"x", &sample(), &mut &b"hi"[..], &mut buf);
        assert!(matches!(err, Err(LizError::UnexpectedEof(_))));
    }

    #[test]
    fn magic_outcomes() {
        assert_eq!(read_magic(&mut &b""[..]).unwrap(), MagicRead::End);
        assert_eq!(read_magic(&mut &b"Li"[..]).unwrap(), MagicRead::Trailing(2));
        assert!(matches!(
            read_magic(&mut &b"Liz2"[..]),
            Err(LizError::BadMagic { got }) if &got == b"Liz2"
        ));
    }

    #[test]
    fn unterminated_name() {
        assert!(matches!(
            read_name(&mut Cursor::new(b"abc".to_vec())),
            Err(LizError::UnterminatedName)
        ));
    }

    #[test]
    fn truncated_crc() {
        assert!(matches!(
            read_crc(&mut &b"\x01\x02"[..]),
            Err(LizError::UnexpectedEof(_))
        ));
    }
}
