//! Controller-local object URLs for fetched documents.

use std::collections::HashMap;

use uuid::Uuid;

struct Blob {
    mime_type: String,
    bytes: Vec<u8>,
}

/// Bytes behind `blob:` URLs; registering a document revokes the previous one.
#[derive(Default)]
pub struct ObjectUrlStore {
    blobs: HashMap<String, Blob>,
    current: Option<String>,
}

impl ObjectUrlStore {
    pub fn register(&mut self, bytes: Vec<u8>, mime_type: impl Into<String>) -> String {
        if let Some(previous) = self.current.take() {
            self.revoke(&previous);
        }
        let url = format!("blob:{}", Uuid::new_v4());
        self.blobs.insert(
            url.clone(),
            Blob {
                mime_type: mime_type.into(),
                bytes,
            },
        );
        self.current = Some(url.clone());
        url
    }

    pub fn revoke(&mut self, url: &str) -> bool {
        if self.current.as_deref() == Some(url) {
            self.current = None;
        }
        self.blobs.remove(url).is_some()
    }

    pub fn resolve(&self, url: &str) -> Option<(&str, &[u8])> {
        self.blobs
            .get(url)
            .map(|blob| (blob.mime_type.as_str(), blob.bytes.as_slice()))
    }

}
