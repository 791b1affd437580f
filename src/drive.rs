// Copyright © 2024 David Caldwell <david@porkrind.org>

use std::path::Path;

/// The geometry of a PDP-8 disk drive. A zero field means "infer from
/// the image file" at open time: zero sides is one side, zero bytes is
/// the file size divided by the side count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Drive {
    pub tracks: usize,
    pub sectors: usize,
    pub sector_size: usize, // in words
    pub bytes: usize,       // image size per side
    pub sides: usize,
}

pub const RK05: Drive = Drive { tracks: 204, sectors: 16, sector_size: 256, bytes: 1662976, sides: 2 };
pub const RX01: Drive = Drive { tracks: 77, sectors: 26, sector_size: 64, bytes: 256256, sides: 1 };
pub const RX02: Drive = Drive { tracks: 77, sectors: 26, sector_size: 128, bytes: 512512, sides: 1 };
pub const DF32: Drive = Drive { tracks: 16, sectors: 1, sector_size: 2048, bytes: 65536, sides: 4 };

/// A drive whose size is taken entirely from the image file, as a single
/// side.
pub const GENERIC: Drive = Drive { tracks: 0, sectors: 0, sector_size: 0, bytes: 0, sides: 0 };

impl Drive {
    /// Pick a drive type from the image file's extension
    /// (case-insensitive). Unknown or missing extensions get [GENERIC].
    pub fn from_path(path: &Path) -> Drive {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("rk05") => RK05,
            Some(ext) if ext.eq_ignore_ascii_case("rx01") => RX01,
            Some(ext) if ext.eq_ignore_ascii_case("rx02") => RX02,
            _ => GENERIC,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_from_path() {
        for (path, want) in [("os8.rk05", RK05),
                             ("os8.RK05", RK05),
                             ("floppy.rx01", RX01),
                             ("floppy.Rx02", RX02),
                             ("somedisk.img", GENERIC),
                             ("noextension", GENERIC)] {
            assert_eq!(want, Drive::from_path(Path::new(path)), "{}", path);
        }
    }
}
