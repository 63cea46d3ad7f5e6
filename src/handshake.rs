//! Session handshake - transport, session, signed logon

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::core::{Credentials, Error, FixConfig, Result};
use crate::fix::{
    FixMessage, FixSession, SecureConnector, SecureStream, SessionEvents, TransportEvents, tag,
    utc_timestamp,
};
use crate::signer::HmacSigner;

/// Separator between pre-sign fields (SOH)
pub const PRESIGN_SEPARATOR: &str = "\x01";

/// Everything the client holds while a session is up
pub struct ActiveSession {
    pub stream: Box<dyn SecureStream>,
    pub session: Arc<dyn FixSession>,
    pub session_events: SessionEvents,
    pub transport_events: TransportEvents,
}

impl std::fmt::Debug for ActiveSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActiveSession")
            .field("sender_comp_id", &self.session.sender_comp_id())
            .field("target_comp_id", &self.session.target_comp_id())
            .finish_non_exhaustive()
    }
}

/// Split `host:port`
pub fn parse_uri(uri: &str) -> Result<(String, u16)> {
    let parts: Vec<&str> = uri.split(':').collect();
    let [host, port] = parts.as_slice() else {
        return Err(Error::InvalidConfig(format!("Invalid FIX URI: {:?}", uri)));
    };

    if host.is_empty() {
        return Err(Error::InvalidConfig(format!("Invalid FIX URI, empty host: {:?}", uri)));
    }

    let port = port
        .parse::<u16>()
        .map_err(|e| Error::InvalidConfig(format!("Invalid FIX URI port {:?}: {}", port, e)))?;

    Ok((host.to_string(), port))
}

/// Canonical string the venue recomputes to verify the logon signature.
/// Field order and separator are fixed.
pub fn presign(
    sending_time: &str,
    msg_type: &str,
    seq_num: u64,
    sender_comp_id: &str,
    target_comp_id: &str,
    passphrase: &str,
) -> String {
    let seq_num = seq_num.to_string();
    [
        sending_time,
        msg_type,
        seq_num.as_str(),
        sender_comp_id,
        target_comp_id,
        passphrase,
    ]
    .join(PRESIGN_SEPARATOR)
}

/// Build the signed Logon (35=A) for `session` at `now`
pub fn build_logon(
    session: &dyn FixSession,
    credentials: &Credentials,
    signer: &HmacSigner,
    heartbeat_secs: u32,
    now: DateTime<Utc>,
) -> FixMessage {
    let sending_time = utc_timestamp(now);
    let payload = presign(
        &sending_time,
        tag::msg_type::LOGON,
        session.outgoing_seq_num(),
        session.sender_comp_id(),
        session.target_comp_id(),
        credentials.passphrase(),
    );
    let signature = signer.sign(&payload);

    FixMessage::new(tag::msg_type::LOGON)
        .with(tag::SENDING_TIME, &sending_time)
        .with(tag::ENCRYPT_METHOD, tag::ENCRYPT_METHOD_NONE)
        .with(tag::HEART_BT_INT, heartbeat_secs)
        .with(tag::PASSWORD, credentials.passphrase())
        .with(tag::RAW_DATA_LENGTH, signature.len())
        .with(tag::RAW_DATA, signature)
}

/// Open the transport, create the session and send the signed logon.
///
/// The session's inbound receiver exists before the logon leaves, so the
/// logon reply cannot be missed. If anything fails after the transport is
/// open the stream is ended before returning.
pub async fn connect(
    config: &FixConfig,
    credentials: &Credentials,
    signer: &HmacSigner,
    connector: &dyn SecureConnector,
) -> Result<ActiveSession> {
    let (host, port) = parse_uri(&config.uri)?;

    info!(%host, port, "Connecting to FIX venue");
    let (stream, transport_events) = connector.open(&host, port).await?;
    debug!(%host, port, "Secure transport ready");

    let (session, session_events) =
        match stream.create_session(credentials.key(), &config.target_comp_id) {
            Ok(created) => created,
            Err(e) => {
                error!(error = %e, "Failed to create FIX session");
                stream.end();
                return Err(e);
            }
        };

    let logon = build_logon(
        session.as_ref(),
        credentials,
        signer,
        config.heartbeat_interval_secs,
        Utc::now(),
    );

    if let Err(e) = session.send(logon, true) {
        error!(error = %e, "Failed to send logon");
        stream.end();
        return Err(e);
    }

    info!(
        sender = session.sender_comp_id(),
        target = session.target_comp_id(),
        "Logon sent"
    );

    Ok(ActiveSession {
        stream,
        session,
        session_events,
        transport_events,
    })
}
