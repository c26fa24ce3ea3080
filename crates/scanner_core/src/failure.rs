use std::fmt;

/// Why an upstream call did not produce usable data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// No response was obtained (DNS, TLS, reset, timeout).
    Connection,
    /// A response arrived with a non-success status.
    HttpStatus(u16),
    /// The body did not parse as the expected structure.
    MalformedResponse,
    /// The body was an HTML document: the upstream is temporarily blocking us.
    SoftBlock,
    /// The upstream answered with a structured GraphQL error list.
    Upstream,
}

impl FailureKind {
    /// Transient kinds allow a scan to hand back what it collected so far.
    pub fn is_transient(self) -> bool {
        !matches!(self, FailureKind::Upstream)
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Connection => write!(f, "connection error"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::MalformedResponse => write!(f, "malformed response"),
            FailureKind::SoftBlock => write!(f, "soft block detected"),
            FailureKind::Upstream => write!(f, "upstream error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct UpstreamError {
    pub kind: FailureKind,
    pub message: String,
}

impl UpstreamError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// End-user text (es-AR) for this failure.
    pub fn user_message(&self) -> String {
        match self.kind {
            FailureKind::Connection => {
                format!("Error de conexión con JustWatch: {}", self.message)
            }
            FailureKind::HttpStatus(code) => format!("Error HTTP {code}: {}", self.message),
            FailureKind::MalformedResponse => "Error al parsear respuesta de JustWatch".to_string(),
            FailureKind::SoftBlock => {
                "JustWatch bloqueó temporalmente las requests. Intentá de nuevo en unos minutos."
                    .to_string()
            }
            FailureKind::Upstream => self.message.clone(),
        }
    }
}
