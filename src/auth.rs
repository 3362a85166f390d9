//! "Continue with Google" through a Supabase project.
//!
//! The flow is the PKCE authorization-code flow with the `plain` challenge
//! method: open the Supabase authorize endpoint in the system browser, catch
//! the redirect on a loopback listener, then trade the code for a session.
//! Everything here blocks, so callers run [`AuthProvider::sign_in`] on a
//! blocking worker.

use crate::config::AuthSettings;
use crate::error::AuthError;
use serde::Deserialize;
use std::io::{ErrorKind, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

const POLL_INTERVAL: Duration = Duration::from_millis(100);
const READ_TIMEOUT: Duration = Duration::from_secs(2);

const SUCCESS_PAGE: &str = "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nConnection: close\r\n\r\n<html><body><h1>Signed in</h1><p>You can close this window and return to Interval Habit.</p><script>window.close();</script></body></html>";
const DENIED_PAGE: &str = "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nConnection: close\r\n\r\n<html><body><h1>Sign-in cancelled</h1><p>You can close this window.</p></body></html>";
const NOT_FOUND: &str = "HTTP/1.1 404 Not Found\r\nConnection: close\r\n\r\n";

/// A signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub email: Option<String>,
}

impl Session {
    /// Name shown in the header and the success toast.
    pub fn display_name(&self) -> &str {
        self.email.as_deref().unwrap_or("your Google account")
    }
}

pub trait AuthProvider: Send + Sync {
    /// Runs the whole sign-in flow. Blocks until it finishes or fails.
    fn sign_in(&self) -> Result<Session, AuthError>;
}

/// Stand-in used until a Supabase project is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct Placeholder;

impl AuthProvider for Placeholder {
    fn sign_in(&self) -> Result<Session, AuthError> {
        Err(AuthError::NotConfigured)
    }
}

#[derive(Debug, Clone)]
pub struct SupabaseGoogle {
    pub project_url: String,
    pub anon_key: String,
    pub redirect_port: u16,
    pub timeout: Duration,
}

impl SupabaseGoogle {
    pub fn redirect_uri(&self) -> String {
        format!("http://localhost:{}", self.redirect_port)
    }

    fn endpoint(&self, path: &str) -> Result<Url, AuthError> {
        Ok(Url::parse(&format!(
            "{}/auth/v1/{}",
            self.project_url.trim_end_matches('/'),
            path
        ))?)
    }

    /// The page the browser is sent to.
    pub fn authorize_url(&self, verifier: &str) -> Result<Url, AuthError> {
        let mut url = self.endpoint("authorize")?;
        url.query_pairs_mut()
            .append_pair("provider", "google")
            .append_pair("redirect_to", &self.redirect_uri())
            .append_pair("code_challenge", verifier)
            .append_pair("code_challenge_method", "plain");
        Ok(url)
    }

    pub fn token_url(&self) -> Result<Url, AuthError> {
        let mut url = self.endpoint("token")?;
        url.query_pairs_mut().append_pair("grant_type", "pkce");
        Ok(url)
    }

    /// Trades an authorization code for a session.
    pub fn exchange(&self, code: &str, verifier: &str) -> Result<Session, AuthError> {
        let url = self.token_url()?;
        let response = ureq::post(url.as_str())
            .set("apikey", &self.anon_key)
            .set("Content-Type", "application/json")
            .send_json(serde_json::json!({
                "auth_code": code,
                "code_verifier": verifier,
            }));

        let response = match response {
            Ok(r) => r,
            Err(ureq::Error::Status(status, r)) => {
                let body = r.into_string().unwrap_or_default();
                return Err(AuthError::Exchange(describe_failure(status, &body)));
            }
            Err(e) => return Err(AuthError::Exchange(e.to_string())),
        };

        let token: TokenResponse = response
            .into_json()
            .map_err(|e| AuthError::InvalidResponse(e.to_string()))?;
        Ok(token.into())
    }
}

impl AuthProvider for SupabaseGoogle {
    fn sign_in(&self) -> Result<Session, AuthError> {
        let verifier = pkce_verifier();
        let url = self.authorize_url(&verifier)?;

        // Listen before the browser can possibly redirect.
        let listener = TcpListener::bind(("127.0.0.1", self.redirect_port)).map_err(AuthError::Callback)?;
        tracing::info!(port = self.redirect_port, "waiting for sign-in callback");

        open::that(url.as_str()).map_err(AuthError::Browser)?;

        let code = wait_for_callback(&listener, Instant::now() + self.timeout)?;
        tracing::debug!("received authorization code, exchanging");
        let session = self.exchange(&code, &verifier)?;
        tracing::info!(email = ?session.email, "signed in");
        Ok(session)
    }
}

/// Picks the provider for the current settings.
pub fn from_settings(settings: &AuthSettings) -> Arc<dyn AuthProvider> {
    match (&settings.supabase_url, &settings.anon_key) {
        (Some(project_url), Some(anon_key)) if settings.is_configured() => Arc::new(SupabaseGoogle {
            project_url: project_url.trim().to_string(),
            anon_key: anon_key.trim().to_string(),
            redirect_port: settings.redirect_port,
            timeout: Duration::from_secs(settings.timeout_secs.max(1)),
        }),
        _ => Arc::new(Placeholder),
    }
}

/// A PKCE code verifier: 64 characters from the unreserved set.
pub fn pkce_verifier() -> String {
    format!("{}{}", uuid::Uuid::new_v4().simple(), uuid::Uuid::new_v4().simple())
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    user: Option<TokenUser>,
}

#[derive(Debug, Deserialize)]
struct TokenUser {
    email: Option<String>,
}

impl From<TokenResponse> for Session {
    fn from(t: TokenResponse) -> Self {
        Session {
            access_token: t.access_token,
            refresh_token: t.refresh_token,
            email: t.user.and_then(|u| u.email),
        }
    }
}

fn describe_failure(status: u16, body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        error_description: Option<String>,
        msg: Option<String>,
        error: Option<String>,
    }

    let detail = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error_description.or(b.msg).or(b.error));
    match detail {
        Some(d) => format!("HTTP {}: {}", status, d),
        None => format!("HTTP {}", status),
    }
}

/// What a request to the loopback listener carried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Callback {
    Code(String),
    Denied(String),
    /// Favicon probes and anything else that is not the redirect.
    Other,
}

/// Reads the redirect out of an HTTP request line such as
/// `GET /?code=abc HTTP/1.1`.
pub fn parse_callback(request_line: &str) -> Callback {
    let mut parts = request_line.split_whitespace();
    let (Some("GET"), Some(target)) = (parts.next(), parts.next()) else {
        return Callback::Other;
    };
    let Ok(url) = Url::parse("http://localhost").and_then(|base| base.join(target)) else {
        return Callback::Other;
    };
    if url.path() != "/" {
        return Callback::Other;
    }

    let mut error = None;
    let mut description = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" if !value.is_empty() => return Callback::Code(value.into_owned()),
            "error" => error = Some(value.into_owned()),
            "error_description" => description = Some(value.into_owned()),
            _ => {}
        }
    }
    match description.or(error) {
        Some(reason) => Callback::Denied(reason),
        None => Callback::Other,
    }
}

/// Serves the loopback listener until the redirect arrives or `deadline`
/// passes.
pub fn wait_for_callback(listener: &TcpListener, deadline: Instant) -> Result<String, AuthError> {
    listener.set_nonblocking(true).map_err(AuthError::Callback)?;
    loop {
        match listener.accept() {
            Ok((stream, _)) => match serve(stream) {
                Ok(Callback::Code(code)) => return Ok(code),
                Ok(Callback::Denied(reason)) => return Err(AuthError::Denied(reason)),
                Ok(Callback::Other) => {}
                Err(e) => tracing::debug!(error = %e, "dropped callback connection"),
            },
            Err(e) if e.kind() == ErrorKind::WouldBlock => {
                if Instant::now() >= deadline {
                    return Err(AuthError::Timeout);
                }
                std::thread::sleep(POLL_INTERVAL);
            }
            Err(e) => return Err(AuthError::Callback(e)),
        }
    }
}

fn serve(mut stream: TcpStream) -> std::io::Result<Callback> {
    stream.set_nonblocking(false)?;
    stream.set_read_timeout(Some(READ_TIMEOUT))?;

    let mut buffer = [0; 4096];
    let n = stream.read(&mut buffer)?;
    let request = String::from_utf8_lossy(&buffer[..n]);
    let line = request.lines().next().unwrap_or("");
    tracing::debug!(request = line, "callback request");

    let callback = parse_callback(line);
    let page = match callback {
        Callback::Code(_) => SUCCESS_PAGE,
        Callback::Denied(_) => DENIED_PAGE,
        Callback::Other => NOT_FOUND,
    };
    stream.write_all(page.as_bytes())?;
    stream.flush()?;
    Ok(callback)
}
