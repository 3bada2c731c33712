//! curl option table
//!
//! Maps long (`--header`) and short (`-H`) option names to the [`Flag`] the
//! parser dispatches on. Options the request model has no use for are still
//! listed, so their arguments are consumed instead of being mistaken for the
//! URL.

/// A recognized curl option
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    Url,
    Request,
    Header,
    /// `-d`, `--data`, `--data-ascii`
    Data,
    DataRaw,
    DataBinary,
    DataUrlencode,
    Json,
    Form,
    FormString,
    User,
    OAuth2Bearer,
    Basic,
    Digest,
    Ntlm,
    Cookie,
    UserAgent,
    Referer,
    Get,
    Head,
    Location,
    LocationTrusted,
    MaxRedirs,
    MaxTime,
    ConnectTimeout,
    Insecure,
    Compressed,
    Proxy,
    Cert,
    Key,
    CaCert,
    Http10,
    Http11,
    Http2,
    Http3,
    /// Known option without an argument that does not affect the request
    NoOp,
    /// Known option whose argument does not affect the request
    NoOpWithArg,
}

impl Flag {
    /// Whether the option consumes an argument
    pub fn takes_arg(&self) -> bool {
        matches!(
            self,
            Flag::Url
                | Flag::Request
                | Flag::Header
                | Flag::Data
                | Flag::DataRaw
                | Flag::DataBinary
                | Flag::DataUrlencode
                | Flag::Json
                | Flag::Form
                | Flag::FormString
                | Flag::User
                | Flag::OAuth2Bearer
                | Flag::Cookie
                | Flag::UserAgent
                | Flag::Referer
                | Flag::MaxRedirs
                | Flag::MaxTime
                | Flag::ConnectTimeout
                | Flag::Proxy
                | Flag::Cert
                | Flag::Key
                | Flag::CaCert
                | Flag::NoOpWithArg
        )
    }
}

/// Look up a long option by name, without the leading `--`
pub fn lookup_long(name: &str) -> Option<Flag> {
    let flag = match name {
        "url" => Flag::Url,
        "request" => Flag::Request,
        "header" => Flag::Header,
        "data" | "data-ascii" => Flag::Data,
        "data-raw" => Flag::DataRaw,
        "data-binary" => Flag::DataBinary,
        "data-urlencode" => Flag::DataUrlencode,
        "json" => Flag::Json,
        "form" => Flag::Form,
        "form-string" => Flag::FormString,
        "user" => Flag::User,
        "oauth2-bearer" => Flag::OAuth2Bearer,
        "basic" => Flag::Basic,
        "digest" => Flag::Digest,
        "ntlm" => Flag::Ntlm,
        "cookie" => Flag::Cookie,
        "user-agent" => Flag::UserAgent,
        "referer" => Flag::Referer,
        "get" => Flag::Get,
        "head" => Flag::Head,
        "location" => Flag::Location,
        "location-trusted" => Flag::LocationTrusted,
        "max-redirs" => Flag::MaxRedirs,
        "max-time" => Flag::MaxTime,
        "connect-timeout" => Flag::ConnectTimeout,
        "insecure" => Flag::Insecure,
        "compressed" => Flag::Compressed,
        "proxy" => Flag::Proxy,
        "cert" => Flag::Cert,
        "key" => Flag::Key,
        "cacert" => Flag::CaCert,
        "http1.0" => Flag::Http10,
        "http1.1" => Flag::Http11,
        "http2" | "http2-prior-knowledge" => Flag::Http2,
        "http3" | "http3-only" => Flag::Http3,
        "silent" | "show-error" | "verbose" | "include" | "fail" | "fail-with-body" | "globoff"
        | "no-buffer" | "remote-name" | "remote-header-name" | "progress-bar" | "no-progress-meter"
        | "ipv4" | "ipv6" | "no-keepalive" | "path-as-is" | "raw" | "tlsv1" | "tlsv1.0"
        | "tlsv1.1" | "tlsv1.2" | "tlsv1.3" | "ssl" | "ssl-reqd" | "tr-encoding" | "anyauth"
        | "negotiate" | "proxy-insecure" | "disable" | "no-sessionid" | "styled-output" => Flag::NoOp,
        "output" | "write-out" | "cookie-jar" | "dump-header" | "config" | "range" | "proxy-user"
        | "upload-file" | "retry" | "retry-delay" | "retry-max-time" | "resolve" | "connect-to"
        | "interface" | "limit-rate" | "max-filesize" | "trace" | "trace-ascii" | "stderr"
        | "key-type" | "cert-type" | "pass" | "capath" | "ciphers" | "time-cond" | "unix-socket"
        | "abstract-unix-socket" | "request-target" | "proto" | "proto-redir" | "aws-sigv4"
        | "output-dir" | "expect100-timeout" | "keepalive-time" | "local-port" | "dns-servers" => {
            Flag::NoOpWithArg
        }
        _ => return None,
    };
    Some(flag)
}

/// Look up a short option by its letter
pub fn lookup_short(c: char) -> Option<Flag> {
    let flag = match c {
        'X' => Flag::Request,
        'H' => Flag::Header,
        'd' => Flag::Data,
        'F' => Flag::Form,
        'u' => Flag::User,
        'b' => Flag::Cookie,
        'A' => Flag::UserAgent,
        'e' => Flag::Referer,
        'G' => Flag::Get,
        'I' => Flag::Head,
        'L' => Flag::Location,
        'm' => Flag::MaxTime,
        'k' => Flag::Insecure,
        'x' => Flag::Proxy,
        'E' => Flag::Cert,
        '0' => Flag::Http10,
        's' | 'S' | 'v' | 'i' | 'O' | 'J' | 'f' | 'g' | 'N' | 'n' | 'q' | 'j' | 'l' | 'p' | 'R'
        | 'B' | 'Z' | '#' | '1' | '2' | '3' | '4' | '6' => Flag::NoOp,
        'o' | 'w' | 'c' | 'D' | 'K' | 'r' | 'T' | 'U' | 'y' | 'Y' | 'z' | 'C' | 'Q' | 't' => {
            Flag::NoOpWithArg
        }
        _ => return None,
    };
    Some(flag)
}
