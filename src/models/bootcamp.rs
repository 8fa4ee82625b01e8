//! Represents a bootcamp listed in the directory.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Placeholder filename used until a bootcamp uploads a photo.
pub const DEFAULT_PHOTO: &str = "no-photo.jpg";

/// Career tracks a bootcamp can prepare students for.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Career {
    #[serde(rename = "Web Development")]
    WebDevelopment,
    #[serde(rename = "Mobile Development")]
    MobileDevelopment,
    #[serde(rename = "UI/UX")]
    UiUx,
    #[serde(rename = "Data Science")]
    DataScience,
    Business,
    Other,
}

impl Career {
    pub const ALL: [Career; 6] = [
        Career::WebDevelopment,
        Career::MobileDevelopment,
        Career::UiUx,
        Career::DataScience,
        Career::Business,
        Career::Other,
    ];

    /// Wire spelling of every career, indexed by discriminant.
    pub const NAMES: [&'static str; 6] = [
        "Web Development",
        "Mobile Development",
        "UI/UX",
        "Data Science",
        "Business",
        "Other",
    ];

    pub fn as_str(&self) -> &'static str {
        Self::NAMES[*self as usize]
    }

    /// Exact, case-sensitive lookup by wire spelling.
    pub fn parse(value: &str) -> Option<Self> {
        Self::NAMES
            .iter()
            .position(|name| *name == value)
            .map(|index| Self::ALL[index])
    }
}

/// GeoJSON point plus the geocoded address parts.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// GeoJSON geometry type; only `Point` is accepted.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// `[longitude, latitude]` in GeoJSON order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub coordinates: Vec<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zipcode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl Location {
    /// `(longitude, latitude)` when the location carries a full coordinate pair.
    pub fn point(&self) -> Option<(f64, f64)> {
        match self.coordinates.as_slice() {
            [lng, lat] => Some((*lng, *lat)),
            _ => None,
        }
    }
}

/// A persisted bootcamp.
///
/// `slug` is always `slugify(name)`; it is recomputed every time the record
/// passes through validation and never taken from client input.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Bootcamp {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: String,
    pub location: Option<Location>,
    pub careers: Vec<Career>,
    pub average_rating: Option<f64>,
    pub average_cost: Option<f64>,
    pub photo: String,
    pub housing: bool,
    pub job_assistance: bool,
    pub job_guarantee: bool,
    pub accept_gi: bool,
    pub created_at: DateTime<Utc>,
}

/// Client-supplied bootcamp fields, as received in a create or update body.
///
/// Every field is optional at this stage; requiredness is decided by the
/// validator. Derived fields (`id`, `slug`, `createdAt`) are not accepted.
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BootcampInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub location: Option<Location>,
    pub careers: Option<Vec<String>>,
    pub average_rating: Option<f64>,
    pub average_cost: Option<f64>,
    pub photo: Option<String>,
    pub housing: Option<bool>,
    pub job_assistance: Option<bool>,
    pub job_guarantee: Option<bool>,
    pub accept_gi: Option<bool>,
}

impl BootcampInput {
    /// Overlay the fields present in `self` onto `base`.
    pub fn merged_over(self, base: BootcampInput) -> BootcampInput {
        BootcampInput {
            name: self.name.or(base.name),
            description: self.description.or(base.description),
            website: self.website.or(base.website),
            phone: self.phone.or(base.phone),
            email: self.email.or(base.email),
            address: self.address.or(base.address),
            location: self.location.or(base.location),
            careers: self.careers.or(base.careers),
            average_rating: self.average_rating.or(base.average_rating),
            average_cost: self.average_cost.or(base.average_cost),
            photo: self.photo.or(base.photo),
            housing: self.housing.or(base.housing),
            job_assistance: self.job_assistance.or(base.job_assistance),
            job_guarantee: self.job_guarantee.or(base.job_guarantee),
            accept_gi: self.accept_gi.or(base.accept_gi),
        }
    }
}

impl From<&Bootcamp> for BootcampInput {
    fn from(bootcamp: &Bootcamp) -> Self {
        BootcampInput {
            name: Some(bootcamp.name.clone()),
            description: Some(bootcamp.description.clone()),
            website: bootcamp.website.clone(),
            phone: bootcamp.phone.clone(),
            email: bootcamp.email.clone(),
            address: Some(bootcamp.address.clone()),
            location: bootcamp.location.clone(),
            careers: Some(
                bootcamp
                    .careers
                    .iter()
                    .map(|career| career.as_str().to_string())
                    .collect(),
            ),
            average_rating: bootcamp.average_rating,
            average_cost: bootcamp.average_cost,
            photo: Some(bootcamp.photo.clone()),
            housing: Some(bootcamp.housing),
            job_assistance: Some(bootcamp.job_assistance),
            job_guarantee: Some(bootcamp.job_guarantee),
            accept_gi: Some(bootcamp.accept_gi),
        }
    }
}

/// A validated bootcamp with its slug derived, ready to be persisted.
#[derive(Clone, Debug, PartialEq)]
pub struct BootcampDraft {
    pub name: String,
    pub slug: String,
    pub description: String,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: String,
    pub location: Option<Location>,
    pub careers: Vec<Career>,
    pub average_rating: Option<f64>,
    pub average_cost: Option<f64>,
    pub photo: String,
    pub housing: bool,
    pub job_assistance: bool,
    pub job_guarantee: bool,
    pub accept_gi: bool,
}

impl BootcampDraft {
    /// Attach storage identity to a validated draft.
    pub fn into_bootcamp(self, id: Uuid, created_at: DateTime<Utc>) -> Bootcamp {
        Bootcamp {
            id,
            name: self.name,
            slug: self.slug,
            description: self.description,
            website: self.website,
            phone: self.phone,
            email: self.email,
            address: self.address,
            location: self.location,
            careers: self.careers,
            average_rating: self.average_rating,
            average_cost: self.average_cost,
            photo: self.photo,
            housing: self.housing,
            job_assistance: self.job_assistance,
            job_guarantee: self.job_guarantee,
            accept_gi: self.accept_gi,
            created_at,
        }
    }
}
