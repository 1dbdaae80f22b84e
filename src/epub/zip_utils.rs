use crate::epub::PublicationInfo;
use crate::epub::media_type::guess_content_type;
use crate::epub::xml_utils;
use crate::error::{EpubError, Result};
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;
use zip::ZipArchive;

pub type EpubArchive = ZipArchive<BufReader<File>>;

/// Open an EPUB archive. Only the `.epub` extension is checked up front;
/// sandboxing the path is the caller's job.
pub fn open_epub(path: &Path) -> Result<EpubArchive> {
    let is_epub = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("epub"));
    if !is_epub {
        return Err(EpubError::NotAnEpub(format!(
            "{} does not have an .epub extension",
            path.display()
        )));
    }

    let file = File::open(path)
        .map_err(|e| EpubError::NotAnEpub(format!("{}: {e}", path.display())))?;
    ZipArchive::new(BufReader::new(file))
        .map_err(|e| EpubError::NotAnEpub(format!("{}: {e}", path.display())))
}

/// Index of an entry, retrying with the percent-decoded name since manifest
/// hrefs are URLs while zip entry names are not.
pub fn entry_index(archive: &EpubArchive, name: &str) -> Option<usize> {
    archive.index_for_name(name).or_else(|| {
        let decoded = percent_encoding::percent_decode_str(name)
            .decode_utf8()
            .ok()?;
        if decoded == name {
            return None;
        }
        archive.index_for_name(&decoded)
    })
}

pub fn read_entry(archive: &mut EpubArchive, name: &str) -> Result<Vec<u8>> {
    let index = entry_index(archive, name).ok_or_else(|| EpubError::ResourceNotFound {
        path: name.to_string(),
    })?;
    let mut entry = archive.by_index(index)?;
    // The declared size comes from the archive and is not trusted as a hint.
    let mut buf = Vec::new();
    entry.read_to_end(&mut buf)?;
    Ok(buf)
}

/// Read an entry as text, honouring a UTF-16 byte order mark.
pub fn read_entry_string(archive: &mut EpubArchive, name: &str) -> Result<String> {
    let bytes = read_entry(archive, name)?;
    Ok(xml_utils::decode_text(&bytes).into_owned())
}

/// Read a whole archive entry into memory.
pub fn read_entry_bytes(info: &PublicationInfo, zip_path: &str) -> Result<Vec<u8>> {
    let mut archive = open_epub(&info.archive_path)?;
    read_entry(&mut archive, zip_path)
}

/// Open a streaming handle onto an archive entry.
///
/// The returned stream owns the archive handle; it is released when the
/// stream is dropped. When the entry does not exist the archive is dropped
/// before the error is returned.
pub fn open_entry_stream(info: &PublicationInfo, zip_path: &str) -> Result<EntryStream> {
    let archive = open_epub(&info.archive_path)?;
    let index = entry_index(&archive, zip_path).ok_or_else(|| EpubError::ResourceNotFound {
        path: zip_path.to_string(),
    })?;

    Ok(EntryStream {
        archive,
        index,
        name: zip_path.to_string(),
    })
}

/// An archive entry together with the archive handle it was opened from.
pub struct EntryStream {
    archive: EpubArchive,
    index: usize,
    name: String,
}

impl EntryStream {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content_type(&self) -> &'static str {
        guess_content_type(&self.name)
    }

    /// Uncompressed size of the entry in bytes.
    pub fn len(&mut self) -> Result<u64> {
        Ok(self.archive.by_index(self.index)?.size())
    }

    pub fn is_empty(&mut self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Decompressing reader over the entry. Each call starts from the
    /// beginning of the entry.
    pub fn reader(&mut self) -> Result<impl Read + '_> {
        Ok(self.archive.by_index(self.index)?)
    }

    /// Stream the entry into `out`, returning the number of bytes copied.
    pub fn copy_to<W: Write + ?Sized>(&mut self, out: &mut W) -> Result<u64> {
        let mut reader = self.reader()?;
        Ok(std::io::copy(&mut reader, out)?)
    }
}
