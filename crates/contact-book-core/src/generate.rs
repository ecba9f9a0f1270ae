//! Sample contact generation.
//!
//! Produces plausible records for demos, load testing, and round-trip tests.
//! Generated emails and phone numbers always pass validation.

use rand::Rng;

use crate::collection::ContactCollection;
use crate::models::ContactRecord;

const FIRST_NAMES: &[&str] = &[
    "Ana", "Bruno", "Carla", "Dario", "Elena", "Felix", "Greta", "Hugo", "Irene", "Joan", "Karin",
    "Lucas", "Marta", "Nico", "Olga", "Pau", "Rosa", "Sergi", "Teresa", "Victor",
];

const LAST_NAMES: &[&str] = &[
    "Garcia", "Lopez", "Martin", "Moll", "Nebot", "Ortega", "Perez", "Ribas", "Serra", "Vidal",
];

const STREETS: &[&str] = &[
    "Carrer Major",
    "Avinguda del Mar",
    "Placa Nova",
    "Cami de Jesus",
    "Carrer dels Oms",
    "Passeig Maritim",
];

const DOMAINS: &[&str] = &["example.com", "example.org", "mail.test", "contacts.dev"];

/// Largest sample callers may request.
pub const MAX_SAMPLE_COUNT: usize = 10_000;

/// Rejects a sample size above [`MAX_SAMPLE_COUNT`].
///
/// The generators themselves do not check; callers taking a count from
/// outside run it through here first.
pub fn check_count(count: usize) -> Result<(), String> {
    if count > MAX_SAMPLE_COUNT {
        return Err(format!(
            "count must be at most {}, got {}",
            MAX_SAMPLE_COUNT, count
        ));
    }
    Ok(())
}

fn pick<'a, R: Rng + ?Sized>(rng: &mut R, items: &[&'a str]) -> &'a str {
    items[rng.gen_range(0..items.len())]
}

/// One random record without an id.
pub fn sample_record<R: Rng + ?Sized>(rng: &mut R) -> ContactRecord {
    let first = pick(rng, FIRST_NAMES);
    let last = pick(rng, LAST_NAMES);
    let email = format!(
        "{}.{}{}@{}",
        first.to_lowercase(),
        last.to_lowercase(),
        rng.gen_range(1..1000),
        pick(rng, DOMAINS)
    );
    let address = format!("{} {}", pick(rng, STREETS), rng.gen_range(1..200));
    let phone = format!(
        "+34 {} {:03} {:03}",
        rng.gen_range(600..800),
        rng.gen_range(0..1000),
        rng.gen_range(0..1000)
    );

    ContactRecord::new()
        .with_name(first)
        .with_last_name(last)
        .with_email(email)
        .with_address(address)
        .with_phone(phone)
}

/// `count` random records without ids.
pub fn sample_records<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<ContactRecord> {
    (0..count).map(|_| sample_record(rng)).collect()
}

/// A collection named `name` holding `count` random records with unique ids.
pub fn sample_collection<R: Rng + ?Sized>(
    name: &str,
    count: usize,
    rng: &mut R,
) -> ContactCollection {
    let mut collection = ContactCollection::new(name);
    for record in sample_records(count, rng) {
        collection.add(record);
    }
    collection
}
