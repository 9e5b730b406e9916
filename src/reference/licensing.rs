//! Manufacturer licensing rules: who could legally print cards for which
//! sport in which year, and which brand dominated each era.

use super::normalize::{contains_phrase, fold_key};
use super::types::{EraRule, ManufacturerInfo, RookieSetRule};
use crate::models::Sport;

#[derive(Debug, Clone)]
pub struct LicenseRegistry {
    manufacturers: Vec<ManufacturerInfo>,
    eras: Vec<EraRule>,
    rookie_sets: Vec<RookieSetRule>,
}

impl LicenseRegistry {
    pub fn new(
        manufacturers: Vec<ManufacturerInfo>,
        eras: Vec<EraRule>,
        rookie_sets: Vec<RookieSetRule>,
    ) -> Self {
        Self {
            manufacturers,
            eras,
            rookie_sets,
        }
    }

    pub fn manufacturers(&self) -> &[ManufacturerInfo] {
        &self.manufacturers
    }

    /// Case-insensitive manufacturer lookup by name.
    pub fn find(&self, name: &str) -> Option<&ManufacturerInfo> {
        let key = fold_key(name);
        self.manufacturers.iter().find(|m| fold_key(&m.name) == key)
    }

    /// True when `name` held a license for `sport` covering `year`.
    pub fn validate_manufacturer(&self, name: &str, sport: Sport, year: i32) -> bool {
        self.find(name)
            .is_some_and(|m| year >= m.founded_year && m.license_for(sport, year).is_some())
    }

    /// Every manufacturer licensed for `sport` at `year`, in dataset order.
    pub fn valid_manufacturers(&self, sport: Sport, year: i32) -> Vec<&ManufacturerInfo> {
        self.manufacturers
            .iter()
            .filter(|m| year >= m.founded_year && m.license_for(sport, year).is_some())
            .collect()
    }

    /// Era-appropriate default among the valid manufacturers.
    ///
    /// Falls back to the first valid manufacturer when the era table has no
    /// opinion or names someone unlicensed that year.
    pub fn dominant_manufacturer(&self, sport: Sport, year: i32) -> Option<&ManufacturerInfo> {
        let valid = self.valid_manufacturers(sport, year);
        if valid.is_empty() {
            return None;
        }

        let pick = |name: &str| {
            let key = fold_key(name);
            valid.iter().copied().find(|m| fold_key(&m.name) == key)
        };

        self.eras
            .iter()
            .find(|era| era.covers(sport, year))
            .and_then(|era| {
                pick(&era.primary).or_else(|| era.secondary.as_deref().and_then(pick))
            })
            .or_else(|| valid.first().copied())
    }

    pub fn has_exclusive_rights(&self, name: &str, sport: Sport, year: i32) -> bool {
        self.find(name)
            .and_then(|m| m.license_for(sport, year))
            .is_some_and(|l| l.exclusive)
    }

    /// Valid manufacturer holding exclusive rights for `sport` at `year`.
    pub fn exclusive_manufacturer(&self, sport: Sport, year: i32) -> Option<&ManufacturerInfo> {
        self.valid_manufacturers(sport, year)
            .into_iter()
            .find(|m| self.has_exclusive_rights(&m.name, sport, year))
    }

    /// Rookie-oriented manufacturer for `sport`/`year`, when one is licensed.
    pub fn rookie_manufacturer(&self, sport: Sport, year: i32) -> Option<&ManufacturerInfo> {
        self.rookie_sets
            .iter()
            .filter(|rule| rule.sport == sport && year >= rule.from_year)
            .find_map(|rule| {
                self.find(&rule.manufacturer)
                    .filter(|m| self.validate_manufacturer(&m.name, sport, year))
            })
    }

    /// Headline set of `manufacturer` for `sport` at `year`.
    pub fn corrected_set(&self, manufacturer: &ManufacturerInfo, sport: Sport, year: i32) -> String {
        manufacturer
            .license_for(sport, year)
            .and_then(|l| l.major_set_names.first().cloned())
            .unwrap_or_else(|| manufacturer.name.clone())
    }

    /// Manufacturers whose name appears as a phrase in `brand`.
    pub fn manufacturers_in(&self, brand: &str) -> Vec<&ManufacturerInfo> {
        let key = fold_key(brand);
        self.manufacturers
            .iter()
            .filter(|m| contains_phrase(&key, &fold_key(&m.name)))
            .collect()
    }

    /// True when any manufacturer named in `brand` is licensed for `sport` at `year`.
    pub fn brand_is_licensed(&self, brand: &str, sport: Sport, year: i32) -> bool {
        self.manufacturers_in(brand)
            .iter()
            .any(|m| self.validate_manufacturer(&m.name, sport, year))
    }
}
