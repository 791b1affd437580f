// Copyright © 2024 David Caldwell <david@porkrind.org>

//! Read and edit OS/8 filesystem images used by PDP-8 computers.
//!
//! A disk image may contain multiple sides, each holding its own OS/8
//! filesystem (typically 1 or 2). Filenames may be prefixed with a side
//! letter (`A:`, `B:`, ...) to select a side; without a prefix the first
//! side is used.
//!
//! OS/8 is a flat filesystem of up to 4,096 blocks, each file contiguous
//! on disk. A block is 256 12-bit words; images store each word as two
//! bytes, low 8 bits first, upper 4 bits in the low nibble of the second
//! byte. Files are listed in directory blocks chained from block 1
//! (block 0 is reserved for a boot block). Each directory block carries a
//! 5 word header (entry count, first data block, next directory block,
//! two reserved words) followed by up to 40 packed entries: 6 words for a
//! file (name in 6-bit ASCII, date stamp, length), 2 words for a free
//! extent. Counts and lengths are stored as `0o10000 - n` so the PDP-8
//! can count them up with ISZ. A file's location on disk is the header's
//! first data block plus the lengths of every entry before it.
//!
//! Format reference: OS/8 Software Support Manual (DEC-S8-OSSMB-A-D),
//! file structure chapters. Scans on bitsavers.org/pdf/dec/pdp8/os8/.

pub mod ascii;
pub mod date;
pub mod disk;
pub mod drive;
pub mod fs;
pub mod words;

pub use date::Date;
pub use disk::{default_image, get_file, open_image, Disk};
pub use drive::{Drive, DF32, GENERIC, RK05, RX01, RX02};
pub use fs::{File, FileInfo, Fs, ScanAction, ScanData};
