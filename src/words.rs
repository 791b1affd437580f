// Copyright © 2024 David Caldwell <david@porkrind.org>

// Conversions between the on-disk byte stream and 12 bit words.

use anyhow::anyhow;
use bytebuffer::{ByteBuffer, Endian};

/// Size of one block on disk, in bytes.
pub const BLOCK_SIZE: usize = 512;
/// Size of one block, in 12 bit words.
pub const WORDS_PER_BLOCK: usize = 256;
/// A 12 bit word never has bits above this set.
pub const WORD_MASK: u16 = 0o7777;

/// Unpack image bytes into 12 bit words (2 bytes per word, little endian).
/// The upper nibble of each odd byte is carried through untouched.
pub fn raw2words(raw: &[u8]) -> anyhow::Result<Vec<u16>> {
    if raw.len() % 2 != 0 {
        return Err(anyhow!("raw2words: odd byte count ({})", raw.len()));
    }
    let mut buf = ByteBuffer::from_bytes(raw);
    buf.set_endian(Endian::LittleEndian);
    (0..raw.len() / 2).map(|_| -> anyhow::Result<u16> { Ok(buf.read_u16()?) }).collect()
}

/// Pack 12 bit words back into image bytes. The upper nibble of each odd
/// byte is always written as zero.
pub fn words2raw(words: &[u16]) -> Vec<u8> {
    let mut buf = ByteBuffer::new();
    buf.set_endian(Endian::LittleEndian);
    for w in words {
        buf.write_u16(*w & WORD_MASK);
    }
    buf.into_vec()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_raw_to_words() {
        assert_eq!(vec![0o201, 0o1403], raw2words(&[0x81, 0x00, 0x03, 0x03]).unwrap());
        assert_eq!(Vec::<u16>::new(), raw2words(&[]).unwrap());
    }

    #[test]
    fn test_odd_length_rejected() {
        assert!(raw2words(&[1, 2, 3]).is_err());
    }

    #[test]
    fn test_words_to_raw_masks_high_nibble() {
        assert_eq!(vec![0xc1, 0x01, 0xd2, 0x02], words2raw(&[0x1c1, 0xf2d2]));
    }

    #[test]
    fn test_round_trip() {
        // bytes -> words -> bytes, for well formed images (high nibbles clear)
        let raw: Vec<u8> = (0..BLOCK_SIZE).map(|i| if i % 2 == 0 { i as u8 } else { (i as u8) & 0x0f }).collect();
        assert_eq!(raw, words2raw(&raw2words(&raw).unwrap()));

        // words -> bytes -> words, for legal 12 bit words
        let words: Vec<u16> = (0..WORDS_PER_BLOCK as u16).map(|w| (w * 17) & WORD_MASK).collect();
        assert_eq!(words, raw2words(&words2raw(&words)).unwrap());
    }

    #[test]
    fn test_high_nibble_preserved_on_read() {
        assert_eq!(vec![0xf001], raw2words(&[0x01, 0xf0]).unwrap());
    }
}
