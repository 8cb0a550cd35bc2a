use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use log::info;

use crate::constants::MAX_ROM_SIZE;
use crate::error::{Chip8Error, Result};

/// Reads a ROM image from disk
///
/// Oversized files are rejected from their metadata before anything is read.
/// Pipes and devices report no size, so the read itself stops one byte past the limit.
pub fn read<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => Chip8Error::NotFound(path.to_path_buf()),
        _ => Chip8Error::Io(e),
    })?;

    let size = file.metadata()?.len() as usize;
    if size > MAX_ROM_SIZE {
        return Err(Chip8Error::RomTooLarge {
            size,
            max: MAX_ROM_SIZE,
        });
    }

    let mut rom = Vec::with_capacity(size);
    file.take(MAX_ROM_SIZE as u64 + 1).read_to_end(&mut rom)?;
    if rom.len() > MAX_ROM_SIZE {
        return Err(Chip8Error::RomTooLarge {
            size: rom.len(),
            max: MAX_ROM_SIZE,
        });
    }
    info!("read {} ({} bytes)", path.display(), rom.len());
    Ok(rom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn scratch_file(name: &str, contents: &[u8]) -> PathBuf {
        let path = std::env::temp_dir().join(format!("emu8-{}-{}", std::process::id(), name));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_read_rom() {
        let path = scratch_file("ok.ch8", &[0x00, 0xE0, 0x12, 0x00]);
        let rom = read(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(rom, vec![0x00, 0xE0, 0x12, 0x00]);
    }

    #[test]
    fn test_read_largest_rom() {
        let path = scratch_file("max.ch8", &[0xAA; MAX_ROM_SIZE]);
        let rom = read(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(rom.len(), 0xE00);
    }

    #[test]
    fn test_read_rom_too_large() {
        let path = scratch_file("big.ch8", &[0xAA; MAX_ROM_SIZE + 1]);
        let result = read(&path);
        fs::remove_file(&path).unwrap();
        assert!(matches!(
            result,
            Err(Chip8Error::RomTooLarge { size: 0xE01, max: 0xE00 })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_read_unsized_source_too_large() {
        // /dev/zero reports a size of 0 and never ends
        assert!(matches!(
            read("/dev/zero"),
            Err(Chip8Error::RomTooLarge { size: 0xE01, max: 0xE00 })
        ));
    }

    #[test]
    fn test_read_missing_rom() {
        let path = std::env::temp_dir().join("emu8-this-rom-does-not-exist.ch8");
        match read(&path) {
            Err(Chip8Error::NotFound(missing)) => assert_eq!(missing, path),
            other => panic!("expected a missing file, got {:?}", other),
        }
    }
}
