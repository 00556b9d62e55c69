//! Minimal reader for MIT keytab files (format version 0x0502).
//!
//! Only the principal of the first live entry is extracted; key material is never decoded.

use crate::error::{Error, Result};

use thiserror::Error as ThisError;

use std::fmt;
use std::fs;
use std::path::Path;

const KEYTAB_V2: [u8; 2] = [0x05, 0x02];

/// A kerberos principal, `primary[/instance]@REALM`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    components: Vec<String>,
    realm: String,
}

impl Principal {
    /// The first name component, used as the remote user.
    pub fn primary(&self) -> &str {
        self.components.first().map(String::as_str).unwrap_or("")
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.components.join("/"), self.realm)
    }
}

pub fn read_first_principal(path: &Path) -> Result<Principal> {
    let bytes = fs::read(path)
        .map_err(|e| Error::auth(format!("reading keytab {}: {}", path.display(), e)))?;
    first_principal(&bytes)
        .map_err(|e| Error::auth(format!("keytab {}: {}", path.display(), e)))
}

/// Principal of the first entry. Holes (negative entry sizes) are skipped.
pub fn first_principal(bytes: &[u8]) -> std::result::Result<Principal, KeytabError> {
    let mut r = Reader { buf: bytes, pos: 0 };
    let version = r.take(2).ok_or(KeytabError::Truncated)?;
    if version != KEYTAB_V2 {
        return Err(KeytabError::Version(u16::from_be_bytes([version[0], version[1]])));
    }

    loop {
        let size = match r.i32() {
            Some(s) => s,
            None => return Err(KeytabError::Empty),
        };
        if size == 0 {
            return Err(KeytabError::Empty);
        }
        if size < 0 {
            r.take(size.unsigned_abs() as usize).ok_or(KeytabError::Truncated)?;
            continue;
        }
        let entry = r.take(size as usize).ok_or(KeytabError::Truncated)?;
        return parse_principal(entry);
    }
}

fn parse_principal(entry: &[u8]) -> std::result::Result<Principal, KeytabError> {
    let mut r = Reader { buf: entry, pos: 0 };
    let count = r.u16().ok_or(KeytabError::Truncated)?;
    let realm = r.string().ok_or(KeytabError::Truncated)?;
    let mut components = Vec::with_capacity(count as usize);
    for _ in 0..count {
        components.push(r.string().ok_or(KeytabError::Truncated)?);
    }
    if components.is_empty() {
        return Err(KeytabError::Truncated);
    }
    Ok(Principal { components, realm })
}

#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum KeytabError {
    #[error("unsupported keytab version {0:#06x}")]
    Version(u16),
    #[error("keytab has no entries")]
    Empty,
    #[error("truncated keytab entry")]
    Truncated,
}

/// Big-endian cursor over a byte slice.
struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize) -> Option<&'a [u8]> {
        let end = self.pos.checked_add(n)?;
        let slice = self.buf.get(self.pos..end)?;
        self.pos = end;
        Some(slice)
    }

    fn u16(&mut self) -> Option<u16> {
        self.take(2).map(|b| u16::from_be_bytes([b[0], b[1]]))
    }

    fn i32(&mut self) -> Option<i32> {
        self.take(4).map(|b| i32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn string(&mut self) -> Option<String> {
        let len = self.u16()? as usize;
        self.take(len).map(|b| String::from_utf8_lossy(b).into_owned())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    fn counted(out: &mut Vec<u8>, s: &str) {
        out.extend_from_slice(&(s.len() as u16).to_be_bytes());
        out.extend_from_slice(s.as_bytes());
    }

    /// Builds a v0x0502 keytab entry body for `components@realm` with a dummy key.
    pub(crate) fn entry(components: &[&str], realm: &str) -> Vec<u8> {
        let mut e = Vec::new();
        e.extend_from_slice(&(components.len() as u16).to_be_bytes());
        counted(&mut e, realm);
        for c in components {
            counted(&mut e, c);
        }
        e.extend_from_slice(&1u32.to_be_bytes()); // name type
        e.extend_from_slice(&0u32.to_be_bytes()); // timestamp
        e.push(1); // kvno
        e.extend_from_slice(&18u16.to_be_bytes());
        e.extend_from_slice(&4u16.to_be_bytes());
        e.extend_from_slice(&[0xde, 0xad, 0xbe, 0xef]);
        e
    }

    pub(crate) fn keytab(entries: &[Vec<u8>]) -> Vec<u8> {
        let mut out = KEYTAB_V2.to_vec();
        for e in entries {
            out.extend_from_slice(&(e.len() as i32).to_be_bytes());
            out.extend_from_slice(e);
        }
        out
    }

    #[test]
    fn reads_first_principal() {
        let bytes = keytab(&[
            entry(&["etl", "gateway.example"], "EXAMPLE.COM"),
            entry(&["other"], "EXAMPLE.COM"),
        ]);
        let p = first_principal(&bytes);
        assert_eq!(
            p.as_ref().map(ToString::to_string),
            Ok("etl/gateway.example@EXAMPLE.COM".to_string())
        );
        assert_eq!(p.as_ref().map(Principal::primary), Ok("etl"));
    }

    #[test]
    fn skips_holes() {
        let mut bytes = KEYTAB_V2.to_vec();
        bytes.extend_from_slice(&(-3i32).to_be_bytes());
        bytes.extend_from_slice(&[0, 0, 0]);
        let e = entry(&["alice"], "R");
        bytes.extend_from_slice(&(e.len() as i32).to_be_bytes());
        bytes.extend_from_slice(&e);
        assert_eq!(first_principal(&bytes).map(|p| p.to_string()), Ok("alice@R".into()));
    }

    #[test]
    fn rejects_bad_keytabs() {
        assert_eq!(first_principal(&KEYTAB_V2), Err(KeytabError::Empty));
        assert_eq!(first_principal(&[0x05, 0x01]), Err(KeytabError::Version(0x0501)));
        assert_eq!(first_principal(&[0x05]), Err(KeytabError::Truncated));
        assert_eq!(
            KeytabError::Version(0x0501).to_string(),
            "unsupported keytab version 0x0501"
        );

        let mut cut = keytab(&[entry(&["alice"], "R")]);
        cut.truncate(cut.len() - 4);
        assert_eq!(first_principal(&cut), Err(KeytabError::Truncated));
    }
}
