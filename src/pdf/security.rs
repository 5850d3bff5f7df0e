use anyhow::{anyhow, Result};
use lopdf::encryption::crypt_filters::{Aes128CryptFilter, Aes256CryptFilter, CryptFilter};
use lopdf::encryption::{EncryptionState, EncryptionVersion, Permissions};
use lopdf::Document;
use std::collections::BTreeMap;
use std::sync::Arc;

pub struct EncryptionOptions {
    pub user_password: String,
    pub owner_password: String,
    /// AES key length: 128 or 256.
    pub key_length: u16,
    pub permissions: Permissions,
}

/// Map the CLI's allow/deny toggles onto the standard security handler's
/// permission bits.
pub fn permissions_from_flags(print: bool, modify: bool, copy: bool, annotate: bool) -> Permissions {
    let mut permissions = Permissions::empty();
    if print {
        permissions.insert(Permissions::PRINTABLE);
        permissions.insert(Permissions::PRINTABLE_IN_HIGH_QUALITY);
    }
    if modify {
        permissions.insert(Permissions::MODIFIABLE);
    }
    if copy {
        permissions.insert(Permissions::COPYABLE);
    }
    if annotate {
        permissions.insert(Permissions::ANNOTABLE);
        permissions.insert(Permissions::FILLABLE);
    }
    permissions
}

/// Encrypt the document in place with AES-128 (standard handler V4) or
/// AES-256 (V5), per `key_length`.
pub fn encrypt(doc: &mut Document, options: &EncryptionOptions) -> Result<()> {
    let filter: Arc<dyn CryptFilter> = match options.key_length {
        256 => Arc::new(Aes256CryptFilter),
        _ => Arc::new(Aes128CryptFilter),
    };
    let mut crypt_filters: BTreeMap<Vec<u8>, Arc<dyn CryptFilter>> = BTreeMap::new();
    crypt_filters.insert(b"StdCF".to_vec(), filter);

    // Each encrypted document gets its own AES key; the passwords only
    // wrap it.
    let file_encryption_key: [u8; 32] = rand::random();

    let state = {
        let version = match options.key_length {
            256 => EncryptionVersion::V5 {
                encrypt_metadata: true,
                crypt_filters,
                file_encryption_key: &file_encryption_key,
                stream_filter: b"StdCF".to_vec(),
                string_filter: b"StdCF".to_vec(),
                owner_password: &options.owner_password,
                user_password: &options.user_password,
                permissions: options.permissions,
            },
            _ => EncryptionVersion::V4 {
                document: doc,
                encrypt_metadata: true,
                crypt_filters,
                stream_filter: b"StdCF".to_vec(),
                string_filter: b"StdCF".to_vec(),
                owner_password: &options.owner_password,
                user_password: &options.user_password,
                permissions: options.permissions,
            },
        };
        EncryptionState::try_from(version)
            .map_err(|err| anyhow!("failed to prepare encryption: {err}"))?
    };

    doc.encrypt(&state)
        .map_err(|err| anyhow!("failed to encrypt document: {err}"))
}

/// Remove encryption in place. Returns false when the document was not
/// encrypted to begin with (the caller then just writes a plain copy).
pub fn decrypt(doc: &mut Document, password: &str) -> Result<bool> {
    if !doc.is_encrypted() {
        return Ok(false);
    }
    doc.decrypt(password)
        .map_err(|err| anyhow!("incorrect password or unsupported encryption: {err}"))?;
    doc.trailer.remove(b"Encrypt");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{dictionary, Object, Stream};

    fn sample_doc() -> Document {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let content_id = doc.add_object(Stream::new(dictionary! {}, b"BT ET".to_vec()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![Object::Reference(page_id)],
                "Count" => 1,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.trailer.set(
            "ID",
            Object::Array(vec![
                Object::string_literal("0123456789abcdef"),
                Object::string_literal("0123456789abcdef"),
            ]),
        );
        doc
    }

    fn options(key_length: u16) -> EncryptionOptions {
        EncryptionOptions {
            user_password: "user".to_string(),
            owner_password: "owner".to_string(),
            key_length,
            permissions: permissions_from_flags(true, false, true, false),
        }
    }

    #[test]
    fn test_encrypt_aes128_round_trip() {
        let mut doc = sample_doc();
        assert!(!doc.is_encrypted());
        encrypt(&mut doc, &options(128)).unwrap();
        assert!(doc.is_encrypted());
        assert!(decrypt(&mut doc, "user").unwrap());
        assert!(!doc.is_encrypted());
    }

    #[test]
    fn test_encrypt_aes256_round_trip() {
        let mut doc = sample_doc();
        encrypt(&mut doc, &options(256)).unwrap();
        assert!(doc.is_encrypted());
        assert!(decrypt(&mut doc, "user").unwrap());
        assert!(!doc.is_encrypted());
    }

    #[test]
    fn test_decrypt_rejects_wrong_password() {
        let mut doc = sample_doc();
        encrypt(&mut doc, &options(256)).unwrap();
        assert!(decrypt(&mut doc, "nope").is_err());
    }

    #[test]
    fn test_decrypt_unencrypted_is_noop() {
        let mut doc = sample_doc();
        assert!(!decrypt(&mut doc, "whatever").unwrap());
    }

    #[test]
    fn test_permission_flags() {
        let all = permissions_from_flags(true, true, true, true);
        assert!(all.contains(Permissions::PRINTABLE));
        assert!(all.contains(Permissions::MODIFIABLE));
        let none = permissions_from_flags(false, false, false, false);
        assert!(!none.contains(Permissions::COPYABLE));
    }
}
