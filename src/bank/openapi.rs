use super::{
    error::ErrorBody,
    handlers::{accounts, health, login, transfers},
    store::Account,
};
use utoipa::{
    openapi::{Contact, InfoBuilder, License},
    OpenApi,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        login::login,
        accounts::create_account,
        accounts::list_accounts,
        accounts::get_account,
        accounts::delete_account,
        transfers::transfer,
    ),
    components(schemas(
        Account,
        ErrorBody,
        accounts::CreateAccountRequest,
        accounts::DeletedResponse,
        login::LoginRequest,
        login::LoginResponse,
        transfers::TransferRequest,
        health::Health,
    )),
    tags(
        (name = "accounts", description = "Account management"),
        (name = "login", description = "Password login and token issuance"),
        (name = "transfers", description = "Transfer requests (not executed)"),
        (name = "health", description = "Service and database status"),
    )
)]
struct ApiDoc;

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();

    let mut info = InfoBuilder::new()
        .title(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .description(optional_str(env!("CARGO_PKG_DESCRIPTION")))
        .build();
    info.contact = cargo_contact();
    info.license = cargo_license();

    doc.info = info;
    doc
}

fn cargo_contact() -> Option<Contact> {
    // Cargo authors are `:` separated and may include "Name <email>".
    let primary = env!("CARGO_PKG_AUTHORS").split(':').next().map(str::trim)?;
    let (name, email) = parse_author(primary);
    if name.is_none() && email.is_none() {
        return None;
    }

    let mut contact = Contact::new();
    contact.name = name.map(str::to_string);
    contact.email = email.map(str::to_string);
    Some(contact)
}

fn cargo_license() -> Option<License> {
    let identifier = optional_str(env!("CARGO_PKG_LICENSE"))?;
    let mut license = License::new(identifier);
    license.identifier = Some(identifier.to_string());
    Some(license)
}

fn optional_str(value: &'static str) -> Option<&'static str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn parse_author(author: &str) -> (Option<&str>, Option<&str>) {
    fn non_empty(s: &str) -> Option<&str> {
        (!s.is_empty()).then_some(s)
    }

    match author.find('<') {
        Some(start) => (
            non_empty(author[..start].trim()),
            non_empty(author[start + 1..].trim_end_matches('>').trim()),
        ),
        None => (non_empty(author.trim()), None),
    }
}
