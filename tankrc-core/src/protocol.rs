//! Wire-protocol constants shared by both ends of a link.

/// Protocol revision; compared for exact equality during the handshake.
pub const PROTOCOL_VERSION: &str = "0001";

/// First token of the line a backend sends as soon as it accepts.
pub const BACKEND_IDENTITY: &str = "IdentifyBackend";

/// First token of the line a frontend answers the backend with.
pub const FRONTEND_IDENTITY: &str = "IdentifyFrontend";

/// Capacity of the receive buffer; bounds the longest acceptable line.
pub const RECV_BUFFER_LEN: usize = 100_000;

/// Capacity of the send buffer.
pub const SEND_BUFFER_LEN: usize = 100_000;

/// Most tokens a single line may carry; extras are dropped.
pub const MAX_TOKENS: usize = 50;

/// Informational notice injected after send-overflow recovery. The leading
/// newline keeps it from gluing onto a partially transmitted line.
pub const STALL_NOTICE: &str = "\nerror Connection Stalled.  RC stopped reading data!\n";

/// Canned refusal sent by a backend whose peer failed the handshake.
pub const HANDSHAKE_REFUSAL: &str = "error IdentifyFrontend expected\n";

/// First token of informational error lines. Never a registered command;
/// receivers log these lines instead of parsing them.
pub const ERROR_TOKEN: &str = "error";
