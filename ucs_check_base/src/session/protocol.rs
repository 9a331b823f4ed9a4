//! aaaLogin / aaaLogout documents

use crate::api::errors::{AuthError, ParseError};
use crate::query::WireElement;
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::{Deserialize, Serialize};

pub const LOGIN_ELEMENT: &str = "aaaLogin";
pub const LOGOUT_ELEMENT: &str = "aaaLogout";
/// Root element of generic XML API failures
pub const ERROR_ELEMENT: &str = "error";

const REDACTED: &str = "********";

pub fn login_document(username: &str, password: &str) -> WireElement {
    WireElement::new(LOGIN_ELEMENT)
        .attribute("inName", username)
        .attribute("inPassword", password)
}

/// Login document safe to write to the log
pub fn redacted_login_document(username: &str) -> WireElement {
    login_document(username, REDACTED)
}

pub fn logout_document(cookie: &str) -> WireElement {
    WireElement::new(LOGOUT_ELEMENT).attribute("inCookie", cookie)
}

/// Attributes of the `aaaLogin` response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginAcknowledgement {
    #[serde(rename = "@cookie", default)]
    pub cookie: String,
    #[serde(rename = "@response", default)]
    pub response: String,
    #[serde(rename = "@outCookie", default, skip_serializing)]
    pub out_cookie: String,
    #[serde(rename = "@outRefreshPeriod", default)]
    pub out_refresh_period: String,
    #[serde(rename = "@outPriv", default)]
    pub out_priv: String,
    #[serde(rename = "@errorCode", default)]
    pub error_code: String,
    #[serde(rename = "@errorDescr", default)]
    pub error_descr: String,
}

impl LoginAcknowledgement {
    /// Parse a login response body.
    ///
    /// The root must be `aaaLogin` or the generic `error` element.
    pub fn parse(body: &str) -> Result<Self, ParseError> {
        if body.trim().is_empty() {
            return Err(ParseError::EmptyResponse);
        }

        let root = root_name(body)?;
        if root != LOGIN_ELEMENT && root != ERROR_ELEMENT {
            return Err(ParseError::Malformed {
                reason: format!("unexpected root element '{}'", root),
            });
        }

        quick_xml::de::from_str(body).map_err(|e| ParseError::Malformed {
            reason: e.to_string(),
        })
    }

    pub fn is_rejected(&self) -> bool {
        let code = self.error_code.trim();
        !code.is_empty() && code != "0"
    }

    /// Session cookie, or the server's reason for refusing one
    pub fn into_cookie(self) -> Result<String, AuthError> {
        if self.is_rejected() {
            return Err(AuthError::Rejected {
                code: self.error_code,
                description: self.error_descr,
            });
        }
        if self.out_cookie.is_empty() {
            return Err(ParseError::Malformed {
                reason: "no outCookie in response".to_string(),
            }
            .into());
        }
        Ok(self.out_cookie)
    }
}

/// Local name of the first element in `body`
fn root_name(body: &str) -> Result<String, ParseError> {
    let mut reader = Reader::from_str(body);
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                return Ok(String::from_utf8_lossy(e.local_name().as_ref()).into_owned())
            }
            Ok(Event::Eof) => return Err(ParseError::EmptyResponse),
            Ok(_) => continue,
            Err(e) => {
                return Err(ParseError::Malformed {
                    reason: e.to_string(),
                })
            }
        }
    }
}
