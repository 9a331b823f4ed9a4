//! # Session
//!
//! Login, one query, logout. A [`Session`] exists only after a successful
//! login and logs out exactly once: through [`Session::close`] or, failing
//! that, when it is dropped. A failed login never produces a session, so no
//! logout is attempted for it.

pub mod protocol;
pub mod transport;

use crate::api::errors::{AuthError, QueryError, TransportError};
use crate::config::runtime::ProbeConfig;
use crate::logging::codes;
use crate::query::QueryDescriptor;
use crate::{log_debug, log_error, log_success, log_warning};
use protocol::{login_document, logout_document, redacted_login_document, LoginAcknowledgement};
use serde::{Deserialize, Serialize};
use std::fmt;

pub use transport::{HttpsTransport, Transport};

/// Cookie issued by `aaaLogin`
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(..)")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    NoSession,
    Authenticating,
    Authenticated,
    Querying,
    LoggingOut,
    Closed,
    /// Login failed; no token was issued
    Failed,
}

/// Entry point holding the transport until login
pub struct SessionClient<T: Transport> {
    transport: T,
    state: SessionState,
}

impl SessionClient<HttpsTransport> {
    /// HTTPS client for the configured controller
    pub fn connect(config: &ProbeConfig) -> Result<Self, TransportError> {
        let transport = HttpsTransport::new(config.endpoint_url(), &config.transport)?;
        log_debug!("Transport ready",
            "url" => transport.endpoint(),
            "max_tls" => config.transport.max_tls
        );
        Ok(Self::new(transport))
    }
}

impl<T: Transport> SessionClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            state: SessionState::NoSession,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Authenticate and open a session
    pub fn login(&mut self, username: &str, password: &str) -> Result<Session<'_, T>, AuthError> {
        self.state = SessionState::Authenticating;
        match self.authenticate(username, password) {
            Ok(token) => {
                self.state = SessionState::Authenticated;
                log_success!(codes::success::LOGIN_SUCCEEDED, "Login succeeded",
                    "user" => username
                );
                Ok(Session {
                    transport: &self.transport,
                    token,
                    state: SessionState::Authenticated,
                })
            }
            Err(e) => {
                self.state = SessionState::Failed;
                let code = match e {
                    AuthError::Rejected { .. } => codes::session::LOGIN_REJECTED,
                    _ => codes::session::LOGIN_RESPONSE_INVALID,
                };
                log_error!(code, "Login failed", "error" => &e);
                Err(e)
            }
        }
    }

    fn authenticate(&self, username: &str, password: &str) -> Result<SessionToken, AuthError> {
        log_debug!("Login request",
            "url" => self.transport.endpoint(),
            "body" => redacted_login_document(username).to_wire()?
        );

        let body = self
            .transport
            .post(&login_document(username, password).to_wire()?)?;
        log_debug!("Login response", "body" => &body);

        let ack = LoginAcknowledgement::parse(&body)?;
        log_debug!("Login acknowledgement",
            "response" => &ack.response,
            "refresh_period" => &ack.out_refresh_period,
            "privileges" => &ack.out_priv,
            "error_code" => &ack.error_code
        );
        ack.into_cookie().map(SessionToken)
    }
}

/// Authenticated session; logs out on close or drop
pub struct Session<'a, T: Transport> {
    transport: &'a T,
    token: SessionToken,
    state: SessionState,
}

impl<T: Transport> Session<'_, T> {
    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn token(&self) -> &SessionToken {
        &self.token
    }

    /// Send one query and return the raw response body
    pub fn query(&mut self, descriptor: &QueryDescriptor) -> Result<String, QueryError> {
        self.state = SessionState::Querying;
        let result = self.send_query(descriptor);
        self.state = SessionState::Authenticated;

        match &result {
            Ok(body) => log_success!(codes::success::QUERY_COMPLETED, "Query completed",
                "subject" => descriptor.subject(),
                "bytes" => body.len()
            ),
            Err(e) => log_error!(codes::session::QUERY_FAILED, "Query failed",
                "subject" => descriptor.subject(),
                "error" => e
            ),
        }
        result
    }

    fn send_query(&self, descriptor: &QueryDescriptor) -> Result<String, QueryError> {
        let request = descriptor.to_wire(self.token.as_str())?;
        log_debug!("Query request", "body" => &request);
        let body = self.transport.post(&request)?;
        log_debug!("Query response", "body" => &body);
        Ok(body)
    }

    /// Log out now
    pub fn close(mut self) {
        self.logout();
    }

    fn logout(&mut self) {
        if matches!(self.state, SessionState::LoggingOut | SessionState::Closed) {
            return;
        }
        self.state = SessionState::LoggingOut;

        let result = logout_document(self.token.as_str())
            .to_wire()
            .map_err(|e| e.to_string())
            .and_then(|request| {
                log_debug!("Logout request", "body" => &request);
                self.transport.post(&request).map_err(|e| e.to_string())
            });

        match result {
            Ok(body) => {
                log_debug!("Logout response", "body" => &body);
                log_success!(codes::success::LOGOUT_COMPLETED, "Logout completed");
            }
            Err(reason) => {
                log_warning!(code = codes::session::LOGOUT_FAILED, "Logout failed",
                    "reason" => reason
                );
            }
        }
        self.state = SessionState::Closed;
    }
}

impl<T: Transport> fmt::Debug for Session<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("endpoint", &self.transport.endpoint())
            .field("token", &self.token)
            .field("state", &self.state)
            .finish()
    }
}

impl<T: Transport> Drop for Session<'_, T> {
    fn drop(&mut self) {
        self.logout();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{FilterKind, PropertyFilter};
    use assert_matches::assert_matches;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    const LOGIN_OK: &str =
        r#"<aaaLogin cookie="" response="yes" outCookie="1550-ab/9e" outRefreshPeriod="600" outPriv="admin"/>"#;

    /// Replays canned responses and records every request
    struct ScriptedTransport {
        responses: RefCell<VecDeque<Result<String, TransportError>>>,
        requests: RefCell<Vec<String>>,
    }

    impl ScriptedTransport {
        fn new(responses: Vec<Result<&str, TransportError>>) -> Self {
            Self {
                responses: RefCell::new(
                    responses
                        .into_iter()
                        .map(|r| r.map(str::to_string))
                        .collect(),
                ),
                requests: RefCell::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<String> {
            self.requests.borrow().clone()
        }

        fn logout_count(&self) -> usize {
            self.requests()
                .iter()
                .filter(|r| r.starts_with("<aaaLogout"))
                .count()
        }
    }

    impl Transport for ScriptedTransport {
        fn endpoint(&self) -> &str {
            "https://scripted/nuova"
        }

        fn post(&self, body: &str) -> Result<String, TransportError> {
            self.requests.borrow_mut().push(body.to_string());
            self.responses
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Ok(String::new()))
        }
    }

    fn class_query() -> QueryDescriptor {
        QueryDescriptor::Class {
            class_name: "equipmentPsu".to_string(),
            hierarchical: false,
            filter: None,
        }
    }

    #[test]
    fn test_full_session() {
        let transport = ScriptedTransport::new(vec![
            Ok(LOGIN_OK),
            Ok(r#"<configResolveClass response="yes"><outConfigs/></configResolveClass>"#),
            Ok(r#"<aaaLogout response="yes" outStatus="success"/>"#),
        ]);
        let mut client = SessionClient::new(transport);
        {
            let mut session = client.login("admin", "secret").unwrap();
            assert_eq!(session.state(), SessionState::Authenticated);
            assert_eq!(session.token().as_str(), "1550-ab/9e");
            let body = session.query(&class_query()).unwrap();
            assert!(body.contains("outConfigs"));
            session.close();
        }

        let requests = client.transport().requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[0], r#"<aaaLogin inName="admin" inPassword="secret"/>"#);
        assert_eq!(
            requests[1],
            r#"<configResolveClass cookie="1550-ab/9e" inHierarchical="false" classId="equipmentPsu"/>"#
        );
        assert_eq!(requests[2], r#"<aaaLogout inCookie="1550-ab/9e"/>"#);
    }

    #[test]
    fn test_rejected_login_sends_nothing_else() {
        let transport = ScriptedTransport::new(vec![Ok(
            r#"<aaaLogin response="yes" errorCode="551" errorDescr="Authentication failed"/>"#,
        )]);
        let mut client = SessionClient::new(transport);
        let result = client.login("admin", "wrong");
        assert_matches!(result, Err(AuthError::Rejected { .. }));
        drop(result);
        assert_eq!(client.state(), SessionState::Failed);
        assert_eq!(client.transport().requests().len(), 1);
    }

    #[test]
    fn test_login_transport_failure() {
        let transport = ScriptedTransport::new(vec![Err(TransportError::ConnectionClosed {
            endpoint: "https://scripted/nuova".to_string(),
        })]);
        let mut client = SessionClient::new(transport);
        assert_matches!(
            client.login("admin", "secret"),
            Err(AuthError::Transport(TransportError::ConnectionClosed { .. }))
        );
        assert_eq!(client.transport().logout_count(), 0);
    }

    #[test]
    fn test_empty_login_response() {
        let transport = ScriptedTransport::new(vec![Ok("")]);
        let mut client = SessionClient::new(transport);
        assert_matches!(
            client.login("admin", "secret"),
            Err(AuthError::Parse(crate::api::errors::ParseError::EmptyResponse))
        );
    }

    #[test]
    fn test_query_failure_still_logs_out_once() {
        let transport = ScriptedTransport::new(vec![
            Ok(LOGIN_OK),
            Err(TransportError::ConnectionReset {
                endpoint: "https://scripted/nuova".to_string(),
            }),
            Ok(r#"<aaaLogout response="yes"/>"#),
        ]);
        let mut client = SessionClient::new(transport);
        {
            let mut session = client.login("admin", "secret").unwrap();
            assert_matches!(
                session.query(&class_query()),
                Err(QueryError::Transport(TransportError::ConnectionReset { .. }))
            );
        }
        assert_eq!(client.transport().logout_count(), 1);
    }

    #[test]
    fn test_close_then_drop_logs_out_once() {
        let transport = ScriptedTransport::new(vec![Ok(LOGIN_OK)]);
        let mut client = SessionClient::new(transport);
        let session = client.login("admin", "secret").unwrap();
        session.close();
        assert_eq!(client.transport().logout_count(), 1);
    }

    #[test]
    fn test_failed_logout_is_not_escalated() {
        let transport = ScriptedTransport::new(vec![
            Ok(LOGIN_OK),
            Ok("<configResolveClass/>"),
            Err(TransportError::ConnectionReset {
                endpoint: "https://scripted/nuova".to_string(),
            }),
        ]);
        let mut client = SessionClient::new(transport);
        let mut session = client.login("admin", "secret").unwrap();
        assert!(session.query(&class_query()).is_ok());
        session.close();
        assert_eq!(client.transport().logout_count(), 1);
    }

    #[test]
    fn test_filtered_query_document() {
        let transport = ScriptedTransport::new(vec![Ok(LOGIN_OK), Ok("<r/>"), Ok("<r/>")]);
        let mut client = SessionClient::new(transport);
        {
            let mut session = client.login("admin", "secret").unwrap();
            let descriptor = QueryDescriptor::Class {
                class_name: "equipmentChassis".to_string(),
                hierarchical: true,
                filter: Some(PropertyFilter::new(
                    FilterKind::Wildcard,
                    "equipmentChassis",
                    "dn",
                    "^sys/chassis-[1-3].*",
                )),
            };
            session.query(&descriptor).unwrap();
        }
        let requests = client.transport().requests();
        assert!(requests[1].contains(
            r#"<inFilter><wcard class="equipmentChassis" property="dn" value="^sys/chassis-[1-3].*"/></inFilter>"#
        ));
    }

    #[test]
    fn test_token_debug_is_redacted() {
        let token = SessionToken("1550-ab/9e".to_string());
        assert_eq!(format!("{:?}", token), "SessionToken(..)");
    }
}
