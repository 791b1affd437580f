// Copyright © 2024 David Caldwell <david@porkrind.org>

// Opening disk images and routing names to the right side.

use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Context};
use lazy_static::lazy_static;

use crate::drive::Drive;
use crate::fs::{File, FileInfo, Fs};
use crate::words::BLOCK_SIZE;

lazy_static! {
    // All open images, keyed by canonical path. Opening the same image
    // twice hands back the same disk, so edits made through one handle
    // are seen by every other.
    static ref DRIVES: Mutex<HashMap<PathBuf, Arc<Disk>>> = Mutex::new(HashMap::new());
}

/// The default image, from the `PDP8_IMAGE` environment variable. Used
/// whenever a path has no image component.
pub fn default_image() -> Option<String> {
    match std::env::var("PDP8_IMAGE") {
        Ok(v) if !v.is_empty() => Some(v),
        _ => None,
    }
}

/// An open disk image with one or more filesystem sides.
#[derive(Debug)]
pub struct Disk {
    pub path: PathBuf,
    pub drive: Drive,
    pub sides: Vec<Fs>,
}

/// Open `path` as a PDP-8 disk image, choosing the drive geometry from
/// the file extension ([Drive::from_path]). An empty path opens the
/// default image. `rw` opens the image read-write.
pub fn open_image(path: &str, rw: bool) -> anyhow::Result<Arc<Disk>> {
    let path = match path {
        "" => default_image().ok_or_else(|| anyhow!("no path to drive"))?,
        p => p.to_owned(),
    };
    Drive::from_path(Path::new(&path)).open_image(&path, rw)
}

/// Fetch a file by combined path: `[IMAGE/][SIDE:]FILE`. The part after
/// the last `/` names the file (with optional side prefix), the part
/// before it names the image, opened read-only. With no `/` at all the
/// default image is used:
///
/// ```text
///   PATH                  IMAGE          SIDE FILE
///   init.tx               $PDP8_IMAGE    A    INIT.TX
///   b:init.tx             $PDP8_IMAGE    B    INIT.TX
///   ./os8.rk05/init.tx    ./os8.rk05     A    INIT.TX
///   ./os8.rk05/b:init.tx  ./os8.rk05     B    INIT.TX
/// ```
pub fn get_file(path: &str) -> anyhow::Result<File> {
    let (image, name) = match path.rfind('/') {
        Some(x) => (path[..x].to_owned(), &path[x + 1..]),
        None => (default_image().unwrap_or_default(), path),
    };
    if image.is_empty() {
        return Err(anyhow!("no path to drive"));
    }
    let disk = open_image(&image, false)?;
    disk.file(name)
}

impl Drive {
    /// Open `path` as a disk image of this drive type. Zero geometry
    /// fields are inferred from the file size, and an image shorter than
    /// the declared side count opens with fewer sides.
    pub fn open_image(mut self, path: impl AsRef<Path>, rw: bool) -> anyhow::Result<Arc<Disk>> {
        let path = match path.as_ref() {
            p if p.as_os_str().is_empty() => {
                PathBuf::from(default_image().ok_or_else(|| anyhow!("no path to drive"))?)
            }
            p => p.to_owned(),
        };
        let path = path.canonicalize().with_context(|| format!("{}", path.display()))?;

        let mut drives = DRIVES.lock().unwrap();
        if let Some(disk) = drives.get(&path) {
            return Ok(disk.clone());
        }

        let mut file = std::fs::OpenOptions::new().read(true).write(rw).open(&path)
            .with_context(|| format!("{}", path.display()))?;
        let size = file.metadata().with_context(|| format!("{}", path.display()))?.len() as usize;
        if self.sides == 0 {
            self.sides = 1;
        }
        if self.bytes == 0 {
            self.bytes = size / self.sides;
        }
        if self.bytes > size {
            return Err(anyhow!("truncated image ({} < {}): {}", size, self.bytes, path.display()));
        }
        // At least one side fits. Drop sides the file doesn't have, so
        // an RK05 image missing its second side opens single-sided.
        while self.bytes * self.sides > size {
            self.sides -= 1;
        }
        // Read the whole declared region once up front so a short or
        // unreadable image fails here rather than halfway through a
        // directory scan.
        let mut data = vec![0u8; self.bytes * self.sides];
        file.read_exact(&mut data).with_context(|| format!("{}", path.display()))?;
        log::debug!("{}: {} side(s) of {} bytes ({} blocks each)",
                    path.display(), self.sides, self.bytes, self.bytes / BLOCK_SIZE);

        let file = Arc::new(Mutex::new(file));
        let disk = Arc::new(Disk {
            path: path.clone(),
            drive: self,
            sides: (0..self.sides).map(|s| Fs {
                file: file.clone(),
                block0: s * self.bytes / BLOCK_SIZE,
                nblocks: self.bytes / BLOCK_SIZE,
            }).collect(),
        });
        drives.insert(path, disk.clone());
        Ok(disk)
    }
}

impl Disk {
    // Split a leading side prefix ("B:") off of name and pick the side
    // it selects. No prefix means the first side.
    fn side<'a>(&self, name: &'a str) -> anyhow::Result<(&Fs, &'a str)> {
        let b = name.as_bytes();
        if name.len() > 2 && b[1] == b':' {
            let n = (b[0] | 0x20).wrapping_sub(b'a') as usize;
            return match self.sides.get(n) {
                Some(fs) => Ok((fs, &name[2..])),
                None => Err(anyhow!("side not found: {}", name)),
            };
        }
        Ok((&self.sides[0], name))
    }

    /// Look up `name`, which may carry a side prefix, and read its
    /// contents.
    pub fn file(&self, name: &str) -> anyhow::Result<File> {
        let (fs, name) = self.side(name)?;
        fs.file(name)
    }

    /// Remove `name`, which may carry a side prefix, in place.
    pub fn remove(&self, name: &str) -> anyhow::Result<()> {
        let (fs, name) = self.side(name)?;
        fs.remove(name)
    }

    /// Every file on every side. When the disk has more than one side
    /// the names come back with their side prefix (`A:NAME.EX`).
    pub fn list(&self) -> anyhow::Result<Vec<FileInfo>> {
        let mut all = vec![];
        for (s, fs) in self.sides.iter().enumerate() {
            let mut files = fs.list()?;
            if self.sides.len() > 1 {
                for f in files.iter_mut() {
                    f.name = format!("{}:{}", (b'A' + s as u8) as char, f.name);
                }
            }
            all.append(&mut files);
        }
        Ok(all)
    }

    /// Forget this disk. The next open of the same path re-reads it;
    /// the descriptor itself closes once the last handle drops.
    pub fn close(&self) {
        DRIVES.lock().unwrap().remove(&self.path);
    }
}
