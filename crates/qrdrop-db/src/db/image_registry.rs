use qrdrop_core::UploadedImage;
use std::collections::HashMap;
use uuid::Uuid;

/// Uploaded images per owner, in insertion order.
#[derive(Debug, Default)]
pub struct ImageRegistry {
    images: HashMap<Uuid, Vec<UploadedImage>>,
}

impl ImageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, owner_user_id: Uuid, image: UploadedImage) {
        self.images.entry(owner_user_id).or_default().push(image);
    }

    /// Images of `owner_user_id`, oldest first. Unknown users get an empty list.
    pub fn list_for(&self, owner_user_id: Uuid) -> Vec<UploadedImage> {
        self.images
            .get(&owner_user_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn total(&self) -> usize {
        self.images.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_for_unknown_user_is_empty() {
        let registry = ImageRegistry::new();
        assert!(registry.list_for(Uuid::new_v4()).is_empty());
        assert_eq!(registry.total(), 0);
    }

    #[test]
    fn test_append_preserves_insertion_order_per_owner() {
        let mut registry = ImageRegistry::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        let first = UploadedImage::new(alice, "https://cdn/1/".to_string());
        let second = UploadedImage::new(alice, "https://cdn/2/".to_string());
        registry.append(alice, first.clone());
        registry.append(bob, UploadedImage::new(bob, "https://cdn/b/".to_string()));
        registry.append(alice, second.clone());

        assert_eq!(registry.list_for(alice), vec![first, second]);
        assert_eq!(registry.list_for(bob).len(), 1);
        assert_eq!(registry.total(), 3);
    }
}
