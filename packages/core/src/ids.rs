// ABOUTME: Typed entity id generation
// ABOUTME: Every entity gets a nanoid with a kind prefix so ids are self-describing in logs

use nanoid::nanoid;

pub fn vendor_id() -> String {
    format!("vendor-{}", nanoid!())
}

pub fn brand_id() -> String {
    format!("brand-{}", nanoid!())
}

pub fn truck_id() -> String {
    format!("truck-{}", nanoid!())
}

pub fn application_id() -> String {
    format!("app-{}", nanoid!())
}

pub fn review_id() -> String {
    format!("rev-{}", nanoid!())
}

pub fn inspection_id() -> String {
    format!("insp-{}", nanoid!())
}

pub fn menu_item_id() -> String {
    format!("item-{}", nanoid!())
}

pub fn user_id() -> String {
    format!("user-{}", nanoid!())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_carry_kind_prefix() {
        assert!(vendor_id().starts_with("vendor-"));
        assert!(application_id().starts_with("app-"));
        assert!(inspection_id().starts_with("insp-"));
    }

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(truck_id(), truck_id());
    }
}
