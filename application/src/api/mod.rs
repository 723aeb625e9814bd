//! Command-line API of the [`Service`].

pub mod property;

use std::path::Path;

use serde::de::DeserializeOwned;
use serde_json::Value;
use service::{
    command::{CreateProperty, DeleteProperty},
    domain::{pricing::RawPricing, property::Location, Pricing},
    query,
    read::property::list,
    Command as _,
};
use tokio::{
    fs,
    io::{AsyncRead, AsyncReadExt as _},
};
use tracing as log;

use crate::{
    args::Command, define_error, error::PropertyError, AsError, Error,
    Service,
};

define_error! {
    enum InputError {
        #[code = "INPUT_UNREADABLE"]
        #[status = BAD_REQUEST]
        #[message = "Failed to read input"]
        Unreadable,

        #[code = "INVALID_INPUT"]
        #[status = BAD_REQUEST]
        #[message = "Input is not a valid JSON request"]
        Malformed,
    }
}

define_error! {
    enum PaginationError {
        #[code = "INVALID_PAGINATION"]
        #[status = BAD_REQUEST]
        #[message = "`after` requires `first`, and `before` requires `last`"]
        Invalid,
    }
}

/// Runs the provided [`Command`] against the provided [`Service`], reading
/// its input from the file it names or from the provided `stdin`.
///
/// Returns the JSON document to print on success.
///
/// # Errors
///
/// If the input is malformed, or the [`Command`] fails.
pub async fn run<R>(
    service: &Service,
    command: Command,
    stdin: R,
) -> Result<Value, Error>
where
    R: AsyncRead + Unpin,
{
    match command {
        Command::Price { mode, input } => {
            let raw = read::<RawPricing, _>(input.as_deref(), stdin).await?;
            let pricing = Pricing::validate_and_compute(&mode, &raw)
                .map_err(AsError::into_error)?;
            serde_json::to_value(pricing).map_err(|e| Error::internal(&e))
        }

        Command::Create { input } => {
            let req = read::<property::CreateRequest, _>(
                input.as_deref(),
                stdin,
            )
            .await?;
            let created = service
                .execute(CreateProperty::try_from(req)?)
                .await
                .map_err(AsError::into_error)?;
            property::view(&created)
        }

        Command::Update { id, input } => {
            let req = read::<property::UpdateRequest, _>(
                input.as_deref(),
                stdin,
            )
            .await?;
            let updated = service
                .execute(req.into_command(id)?)
                .await
                .map_err(AsError::into_error)?;
            property::view(&updated)
        }

        Command::Delete { id } => {
            let deleted = service
                .execute(DeleteProperty { id })
                .await
                .map_err(AsError::into_error)?;
            property::view(&deleted)
        }

        Command::Show { id } => {
            let found = service
                .execute(query::property::ById::by(id))
                .await
                .map_err(AsError::into_error)?
                .ok_or_else(|| Error::from(PropertyError::NotExists))?;
            property::view(&found)
        }

        Command::List {
            mode,
            min_price,
            max_price,
            location,
            first,
            after,
            last,
            before,
        } => {
            let location = location
                .map(|l| {
                    Location::new(&l).ok_or_else(|| {
                        Error::from(property::AttributeError::Invalid)
                            .with_field("location")
                    })
                })
                .transpose()?;
            let filter = list::Filter {
                listing_mode: mode,
                min_price,
                max_price,
                location,
            };
            let arguments = service
                .config()
                .list_arguments(first, after, last, before)
                .ok_or_else(|| Error::from(PaginationError::Invalid))?;

            let total = service
                .execute(query::properties::TotalCount::by(filter.clone()))
                .await
                .map_err(AsError::into_error)?;
            let page = service
                .execute(query::properties::List::by(list::Selector {
                    arguments,
                    filter,
                }))
                .await
                .map_err(AsError::into_error)?;
            property::page(&page, total)
        }
    }
}

/// Reads a JSON request from the provided `input` file, or from the
/// provided `stdin` if there is none.
async fn read<T, R>(input: Option<&Path>, mut stdin: R) -> Result<T, Error>
where
    T: DeserializeOwned,
    R: AsyncRead + Unpin,
{
    let bytes = match input {
        Some(path) => fs::read(path).await,
        None => {
            let mut bytes = Vec::new();
            stdin.read_to_end(&mut bytes).await.map(|_| bytes)
        }
    }
    .map_err(|e| {
        log::debug!("failed to read input: {e}");
        Error::from(InputError::Unreadable)
    })?;

    serde_json::from_slice(&bytes).map_err(|e| {
        let mut error = Error::from(InputError::Malformed);
        error.message = format!("{}: {e}", error.message);
        error
    })
}
