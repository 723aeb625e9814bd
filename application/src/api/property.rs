//! [`Property`]-related requests and views.

use std::str::FromStr;

use derive_more::Display;
use serde::{Deserialize, Deserializer};
use serde_json::{json, Value};
use service::{
    command::{CreateProperty, UpdateProperty},
    domain::{pricing::RawPricing, property, Property},
    read::property::list,
};

use crate::{define_error, Error};

define_error! {
    enum AttributeError {
        #[code = "MISSING_REQUIRED_FIELD"]
        #[status = BAD_REQUEST]
        #[message = "Required `Property` attribute is missing"]
        Missing,

        #[code = "INVALID_ATTRIBUTE"]
        #[status = BAD_REQUEST]
        #[message = "`Property` attribute is blank or too long"]
        Invalid,
    }
}

/// Textual attribute, as relayed from a client request.
///
/// Form fields may carry numbers where text is expected (khatauni and khasra
/// numbers, mostly).
#[derive(Clone, Debug, Deserialize, Display)]
#[serde(untagged)]
pub enum Text {
    /// JSON string.
    String(String),

    /// JSON number.
    Number(serde_json::Number),
}

/// Request for creating a new [`Property`].
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequest {
    /// Title of a new [`Property`].
    #[serde(default)]
    pub title: Option<Text>,

    /// Description of a new [`Property`].
    ///
    /// Blank one counts as absent, while a too long one is rejected.
    #[serde(default)]
    pub description: Option<Text>,

    /// Location of a new [`Property`].
    #[serde(default)]
    pub location: Option<Text>,

    /// Khatauni number of a new [`Property`].
    #[serde(default)]
    pub khatauni: Option<Text>,

    /// Khasra number of a new [`Property`].
    #[serde(default)]
    pub khasra: Option<Text>,

    /// Listing mode of a new [`Property`].
    #[serde(default, alias = "listingMode")]
    pub property_for: String,

    /// Raw pricing fields of a new [`Property`].
    #[serde(default)]
    pub pricing: RawPricing,
}

impl TryFrom<CreateRequest> for CreateProperty {
    type Error = Error;

    fn try_from(req: CreateRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            title: required("title", req.title)?,
            description: description(req.description)?,
            location: required("location", req.location)?,
            khatauni: required("khatauni", req.khatauni)?,
            khasra: required("khasra", req.khasra)?,
            listing_mode: req.property_for,
            pricing: req.pricing,
        })
    }
}

/// Request for updating an existing [`Property`].
///
/// Absent attributes are left untouched.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequest {
    /// New title of the [`Property`].
    #[serde(default)]
    pub title: Option<Text>,

    /// New description of the [`Property`].
    ///
    /// `null` or blank one removes the current description, while a too long
    /// one is rejected.
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<Text>>,

    /// New location of the [`Property`].
    #[serde(default)]
    pub location: Option<Text>,

    /// New khatauni number of the [`Property`].
    #[serde(default)]
    pub khatauni: Option<Text>,

    /// New khasra number of the [`Property`].
    #[serde(default)]
    pub khasra: Option<Text>,

    /// New listing mode of the [`Property`].
    #[serde(default, alias = "listingMode")]
    pub property_for: Option<String>,

    /// Raw pricing fields to overlay the stored ones with.
    #[serde(default)]
    pub pricing: RawPricing,
}

impl UpdateRequest {
    /// Converts this [`UpdateRequest`] into an [`UpdateProperty`] command for
    /// the [`Property`] with the provided `id`.
    ///
    /// # Errors
    ///
    /// If any provided attribute is blank or too long.
    pub fn into_command(
        self,
        id: property::Id,
    ) -> Result<UpdateProperty, Error> {
        Ok(UpdateProperty {
            id,
            title: optional("title", self.title)?,
            description: self
                .description
                .map(description)
                .transpose()?,
            location: optional("location", self.location)?,
            khatauni: optional("khatauni", self.khatauni)?,
            khasra: optional("khasra", self.khasra)?,
            listing_mode: self.property_for,
            pricing: self.pricing,
        })
    }
}

/// Deserializes a present `null` as `Some(None)`, distinguishing it from an
/// absent field.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Parses the provided `description`, treating a blank one as absent.
fn description(
    value: Option<Text>,
) -> Result<Option<property::Description>, Error> {
    let Some(value) = value.map(|v| v.to_string()) else {
        return Ok(None);
    };
    if value.trim().is_empty() {
        return Ok(None);
    }
    property::Description::new(value).map(Some).ok_or_else(|| {
        Error::from(AttributeError::Invalid).with_field("description")
    })
}

/// Parses the provided required attribute `value`.
fn required<T: FromStr>(
    field: &'static str,
    value: Option<Text>,
) -> Result<T, Error> {
    value
        .ok_or_else(|| Error::from(AttributeError::Missing).with_field(field))
        .and_then(|v| parse(field, &v))
}

/// Parses the provided optional attribute `value`.
fn optional<T: FromStr>(
    field: &'static str,
    value: Option<Text>,
) -> Result<Option<T>, Error> {
    value.map(|v| parse(field, &v)).transpose()
}

/// Parses the provided attribute `value`.
fn parse<T: FromStr>(field: &'static str, value: &Text) -> Result<T, Error> {
    value
        .to_string()
        .parse()
        .map_err(|_| Error::from(AttributeError::Invalid).with_field(field))
}

/// Renders the provided [`Property`] for a client.
///
/// # Errors
///
/// If the [`Property`] fails to serialize.
pub fn view(property: &Property) -> Result<Value, Error> {
    let mut document =
        serde_json::to_value(property).map_err(|e| Error::internal(&e))?;
    if let Value::Object(fields) = &mut document {
        _ = fields.insert(
            "propertyFor".into(),
            property.listing_mode().to_string().into(),
        );
    }
    Ok(document)
}

/// Renders the provided [`list::Page`] of [`Property`]s for a client.
///
/// # Errors
///
/// If any [`Property`] fails to serialize.
pub fn page(
    page: &list::Page,
    total: list::TotalCount,
) -> Result<Value, Error> {
    let edges = page
        .edges
        .iter()
        .map(|edge| {
            Ok(json!({
                "cursor": edge.cursor,
                "node": view(&edge.node)?,
            }))
        })
        .collect::<Result<Vec<_>, Error>>()?;
    let info = page.page_info();

    Ok(json!({
        "edges": edges,
        "pageInfo": {
            "startCursor": info.start_cursor,
            "endCursor": info.end_cursor,
            "hasNextPage": info.has_next_page,
            "hasPreviousPage": info.has_previous_page,
        },
        "totalCount": usize::from(total),
    }))
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use service::command::CreateProperty;

    use super::{CreateRequest, UpdateRequest};

    fn create(request: serde_json::Value) -> CreateRequest {
        serde_json::from_value(request).unwrap()
    }

    #[test]
    fn accepts_numeric_land_records() {
        let cmd = CreateProperty::try_from(create(json!({
            "title": " Plot ",
            "description": "   ",
            "location": "Noida",
            "khatauni": 12,
            "khasra": "44/2",
            "listingMode": "Rent",
        })))
        .unwrap();

        assert_eq!(cmd.title.to_string(), "Plot");
        assert_eq!(cmd.description, None);
        assert_eq!(cmd.khatauni.to_string(), "12");
        assert_eq!(cmd.khasra.to_string(), "44/2");
        assert_eq!(cmd.listing_mode, "Rent");
    }

    #[test]
    fn reports_offending_attribute() {
        let err = CreateProperty::try_from(create(json!({
            "title": "Plot",
            "location": "Noida",
            "khatauni": 12,
        })))
        .unwrap_err();
        assert_eq!(err.code, "MISSING_REQUIRED_FIELD");
        assert_eq!(err.field.as_deref(), Some("khasra"));

        let err = CreateProperty::try_from(create(json!({
            "title": "",
            "location": "Noida",
            "khatauni": 12,
            "khasra": 7,
        })))
        .unwrap_err();
        assert_eq!(err.code, "INVALID_ATTRIBUTE");
        assert_eq!(err.field.as_deref(), Some("title"));
    }

    #[test]
    fn distinguishes_null_description() {
        let id = service::domain::property::Id::new();

        let req: UpdateRequest = serde_json::from_value(json!({})).unwrap();
        assert_eq!(req.into_command(id).unwrap().description, None);

        let req: UpdateRequest =
            serde_json::from_value(json!({"description": null})).unwrap();
        assert_eq!(req.into_command(id).unwrap().description, Some(None));
    }

    #[test]
    fn rejects_too_long_description() {
        let long = "x".repeat(9000);

        let err = CreateProperty::try_from(create(json!({
            "title": "Plot",
            "description": long,
            "location": "Noida",
            "khatauni": 12,
            "khasra": 7,
        })))
        .unwrap_err();
        assert_eq!(err.code, "INVALID_ATTRIBUTE");
        assert_eq!(err.field.as_deref(), Some("description"));

        let req: UpdateRequest =
            serde_json::from_value(json!({"description": long})).unwrap();
        let err = req
            .into_command(service::domain::property::Id::new())
            .unwrap_err();
        assert_eq!(err.code, "INVALID_ATTRIBUTE");
        assert_eq!(err.field.as_deref(), Some("description"));
    }

    #[test]
    fn keeps_description_at_length_limit() {
        let id = service::domain::property::Id::new();
        let text = "x".repeat(8192);

        let req: UpdateRequest =
            serde_json::from_value(json!({"description": text})).unwrap();
        let description = req.into_command(id).unwrap().description;
        assert_eq!(
            description.flatten().map(|d| d.to_string()),
            Some(text),
        );

        let req: UpdateRequest =
            serde_json::from_value(json!({"description": "  "})).unwrap();
        assert_eq!(req.into_command(id).unwrap().description, Some(None));
    }
}
