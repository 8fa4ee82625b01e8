//! Bootcamp constraints and the validate-and-normalize step run before
//! every write.

use super::{FieldRule, FieldSource, FieldValue, Rule, ValidationErrors, check_rules, violation};
use crate::{
    models::bootcamp::{BootcampDraft, BootcampInput, Career, DEFAULT_PHOTO},
    slug::slugify,
};
use once_cell::sync::Lazy;
use regex::Regex;
use validator::Validate;

pub const NAME_MAX_LEN: u64 = 50;
pub const DESCRIPTION_MAX_LEN: u64 = 500;
pub const PHONE_MAX_LEN: u64 = 20;
pub const RATING_MIN: f64 = 1.0;
pub const RATING_MAX: f64 = 10.0;

// Word classes and boundaries are ASCII-only, as in the patterns clients were
// first validated against.
static WEBSITE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"https?://(www\.)?[-a-zA-Z0-9@:%._+~#=]{1,256}\.[a-zA-Z0-9()]{1,6}(?-u:\b)([-a-zA-Z0-9()@:%_+.~#?&/=]*)",
    )
    .expect("WEBSITE_RE should be a valid regex pattern")
});

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?-u:\w)+([.-]?(?-u:\w)+)*@(?-u:\w)+([.-]?(?-u:\w)+)*(\.(?-u:\w){2,3})+$")
        .expect("EMAIL_RE should be a valid regex pattern")
});

static BOOTCAMP_RULES: &[FieldRule] = &[
    FieldRule {
        field: "name",
        rule: Rule::Required,
        message: "Please add a name",
    },
    FieldRule {
        field: "name",
        rule: Rule::MaxLength(NAME_MAX_LEN),
        message: "Name can not be more than 50 characters",
    },
    FieldRule {
        field: "description",
        rule: Rule::Required,
        message: "Please add a description",
    },
    FieldRule {
        field: "description",
        rule: Rule::MaxLength(DESCRIPTION_MAX_LEN),
        message: "Description can not be more than 500 characters",
    },
    FieldRule {
        field: "website",
        rule: Rule::Matches(&WEBSITE_RE),
        message: "Please use a valid URL with HTTP or HTTPS",
    },
    FieldRule {
        field: "phone",
        rule: Rule::MaxLength(PHONE_MAX_LEN),
        message: "Phone number can not be longer than 20 characters",
    },
    FieldRule {
        field: "email",
        rule: Rule::Matches(&EMAIL_RE),
        message: "Please use a valid email address",
    },
    FieldRule {
        field: "address",
        rule: Rule::Required,
        message: "Please add an address",
    },
    FieldRule {
        field: "location.type",
        rule: Rule::OneOf(&["Point"]),
        message: "Location type must be Point",
    },
    FieldRule {
        field: "careers",
        rule: Rule::Required,
        message: "Please add at least one career",
    },
    FieldRule {
        field: "careers",
        rule: Rule::OneOf(&Career::NAMES),
        message: "Careers must be one of: Web Development, Mobile Development, UI/UX, Data Science, Business, Other",
    },
    FieldRule {
        field: "averageRating",
        rule: Rule::Min(RATING_MIN),
        message: "Rating must be at least 1",
    },
    FieldRule {
        field: "averageRating",
        rule: Rule::Max(RATING_MAX),
        message: "Rating can not be more than 10",
    },
];

impl FieldSource for BootcampInput {
    fn field(&self, name: &str) -> FieldValue<'_> {
        fn text(value: &Option<String>) -> FieldValue<'_> {
            value.as_deref().map_or(FieldValue::Missing, FieldValue::Text)
        }

        match name {
            "name" => text(&self.name),
            "description" => text(&self.description),
            "website" => text(&self.website),
            "phone" => text(&self.phone),
            "email" => text(&self.email),
            "address" => text(&self.address),
            "location.type" => self
                .location
                .as_ref()
                .map_or(FieldValue::Missing, |location| text(&location.kind)),
            "careers" => self
                .careers
                .as_deref()
                .map_or(FieldValue::Missing, FieldValue::List),
            "averageRating" => self
                .average_rating
                .map_or(FieldValue::Missing, FieldValue::Number),
            _ => FieldValue::Missing,
        }
    }
}

impl Validate for BootcampInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_rules(self, BOOTCAMP_RULES, &mut errors);
        if !coordinates_valid(self) {
            errors.add(
                "location.coordinates",
                violation(
                    "coordinates",
                    "Coordinates must be [longitude, latitude] within valid ranges",
                ),
            );
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Validate a candidate bootcamp and derive its slug.
///
/// The name is trimmed before the rules run. On success the returned draft
/// carries `slug = slugify(name)`, `photo` and the boolean flags defaulted only
/// where they were absent, and careers deduplicated in first-seen order.
/// Every other field is passed through as given.
pub fn validate_and_normalize(input: BootcampInput) -> Result<BootcampDraft, ValidationErrors> {
    let input = BootcampInput {
        name: input.name.map(|name| name.trim().to_string()),
        ..input
    };
    input.validate()?;

    let name = input.name.unwrap_or_default();
    let slug = slugify(&name);

    let mut careers: Vec<Career> = Vec::new();
    for career in input
        .careers
        .unwrap_or_default()
        .iter()
        .filter_map(|value| Career::parse(value))
    {
        if !careers.contains(&career) {
            careers.push(career);
        }
    }

    Ok(BootcampDraft {
        name,
        slug,
        description: input.description.unwrap_or_default(),
        website: input.website,
        phone: input.phone,
        email: input.email,
        address: input.address.unwrap_or_default(),
        location: input.location,
        careers,
        average_rating: input.average_rating,
        average_cost: input.average_cost,
        photo: input.photo.unwrap_or_else(|| DEFAULT_PHOTO.to_string()),
        housing: input.housing.unwrap_or(false),
        job_assistance: input.job_assistance.unwrap_or(false),
        job_guarantee: input.job_guarantee.unwrap_or(false),
        accept_gi: input.accept_gi.unwrap_or(false),
    })
}

/// GeoJSON coordinates are either absent or a `[lng, lat]` pair in range.
fn coordinates_valid(input: &BootcampInput) -> bool {
    let Some(location) = input.location.as_ref() else {
        return true;
    };
    match location.coordinates.as_slice() {
        [] => true,
        [lng, lat] => (-180.0..=180.0).contains(lng) && (-90.0..=90.0).contains(lat),
        _ => false,
    }
}
