#![allow(dead_code)]

use regionmatch_core::{Levenshtein, ReferenceRow, Similarity};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Karnataka slice used across the integration tests.
pub fn karnataka() -> Vec<ReferenceRow> {
    let rows = [
        ("state_29", "Karnataka", None),
        ("district_572", "Bengaluru Urban", Some("state_29")),
        ("district_581", "Bengaluru Rural", Some("state_29")),
        ("district_583", "Mandya", Some("state_29")),
        ("district_584", "Mysuru", Some("state_29")),
        ("subdistrict_5536", "Bengaluru East", Some("district_572")),
        ("subdistrict_5537", "Bengaluru North", Some("district_572")),
        ("subdistrict_5538", "Anekal", Some("district_572")),
        ("subdistrict_5550", "Hoskote", Some("district_581")),
        ("subdistrict_5600", "Maddur", Some("district_583")),
        ("subdistrict_5601", "Malavalli", Some("district_583")),
        ("subdistrict_5610", "Nanjangud", Some("district_584")),
        ("village_1", "Whitefield", Some("subdistrict_5536")),
        ("village_2", "Varthur", Some("subdistrict_5536")),
        ("village_3", "Kadugodi", Some("subdistrict_5536")),
        ("village_4", "Yelahanka", Some("subdistrict_5537")),
        ("village_5", "Hebbal", Some("subdistrict_5537")),
        ("village_6", "Attibele", Some("subdistrict_5538")),
        ("village_7", "Sarjapura", Some("subdistrict_5538")),
        ("village_8", "Sulibele", Some("subdistrict_5550")),
        ("village_9", "Whitefield", Some("subdistrict_5600")),
        ("village_10", "Besagarahalli", Some("subdistrict_5600")),
    ];
    rows.into_iter()
        .map(|(id, name, parent)| ReferenceRow::new(id, name, parent))
        .collect()
}

/// Levenshtein that counts how often it is asked for a score.
#[derive(Default)]
pub struct CountingSimilarity {
    inner: Levenshtein,
    calls: AtomicUsize,
}

impl CountingSimilarity {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Similarity for CountingSimilarity {
    fn score(&self, a: &str, b: &str) -> f64 {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.score(a, b)
    }
}

pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-12
}
