//! Static structure of the appointment form.

use chrono::{Datelike, Local};

use crate::models::field::{FieldKind, FieldSpec};

pub const FULL_NAME: &str = "fullName";
pub const PHONE: &str = "phone";
pub const EMAIL: &str = "email";
pub const ADDRESS: &str = "address";
pub const LICENSE_PLATE: &str = "licensePlate";
pub const VEHICLE_BRAND: &str = "vehicleBrand";
pub const VEHICLE_MODEL: &str = "vehicleModel";
pub const VEHICLE_YEAR: &str = "vehicleYear";
pub const VEHICLE_COLOR: &str = "vehicleColor";
pub const PREFERRED_DATE: &str = "preferredDate";
pub const PROBLEM_DESCRIPTION: &str = "problemDescription";

/// Field specs of the booking form, in display order.
///
/// Vehicle years run from `min_vehicle_year` through next calendar year.
pub fn appointment_form(min_vehicle_year: i64) -> Vec<FieldSpec> {
    let max_vehicle_year = i64::from(Local::now().year()) + 1;

    vec![
        FieldSpec::required(FULL_NAME, "Full name", FieldKind::Text),
        FieldSpec::required(PHONE, "Phone", FieldKind::Tel),
        FieldSpec::optional(EMAIL, "Email", FieldKind::Email),
        FieldSpec::optional(ADDRESS, "Address", FieldKind::Text),
        FieldSpec::required(LICENSE_PLATE, "License plate", FieldKind::Plate),
        FieldSpec::required(VEHICLE_BRAND, "Vehicle brand", FieldKind::Text),
        FieldSpec::required(VEHICLE_MODEL, "Vehicle model", FieldKind::Text),
        FieldSpec::optional(VEHICLE_YEAR, "Vehicle year", FieldKind::Number)
            .with_bounds(Some(min_vehicle_year), Some(max_vehicle_year)),
        FieldSpec::optional(VEHICLE_COLOR, "Vehicle color", FieldKind::Text),
        FieldSpec::required(PREFERRED_DATE, "Preferred date", FieldKind::DateTime),
        FieldSpec::required(PROBLEM_DESCRIPTION, "Problem description", FieldKind::Text),
    ]
}
