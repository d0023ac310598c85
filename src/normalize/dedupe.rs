use std::collections::HashMap;

use crate::model::OfficerRecord;

const KEY_SEPARATOR: &str = "::";

/// Email when present, otherwise name and position together.
pub fn identity_key(record: &OfficerRecord) -> Option<String> {
    let email = record.email.trim().to_lowercase();
    if !email.is_empty() {
        return Some(email);
    }

    let name = record.name.trim().to_lowercase();
    let position = record.position.trim().to_lowercase();
    if name.is_empty() || position.is_empty() {
        return None;
    }

    Some(format!("{name}{KEY_SEPARATOR}{position}"))
}

/// Collapses records sharing an identity key, last write wins, keeping the
/// slot of the key's first appearance. Unkeyed records follow in input order.
pub fn dedupe_officers(records: Vec<OfficerRecord>) -> Vec<OfficerRecord> {
    let mut keyed = Vec::<OfficerRecord>::new();
    let mut slots = HashMap::<String, usize>::new();
    let mut unkeyed = Vec::<OfficerRecord>::new();

    for record in records {
        let Some(key) = identity_key(&record) else {
            unkeyed.push(record);
            continue;
        };

        if let Some(&slot) = slots.get(&key) {
            keyed[slot] = record;
            continue;
        }

        slots.insert(key, keyed.len());
        keyed.push(record);
    }

    keyed.extend(unkeyed);
    keyed
}
