//! Connection handshake event
//!
//! Sent once per connection, immediately after the transport reports a
//! successful socket open. The client is not `Connected` until this event is
//! acknowledged.

use crate::wire::{Encode, EncodeError, Encoder, MapEncoder, WireValue};

use super::{Method, RequestEvent};

/// Gateway handshake request, empty body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SocketConnect;

impl Encode for SocketConnect {
    fn encode(&self, enc: &mut Encoder) -> Result<(), EncodeError> {
        enc.emit(MapEncoder::new().finish())
    }
}

impl RequestEvent for SocketConnect {
    const METHOD: Method = Method::Get;
    const URL: &'static str = "/api/v3/socket/connect";

    type Response = WireValue;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::to_wire;

    #[test]
    fn test_handshake_constants() {
        assert_eq!(SocketConnect::METHOD, Method::Get);
        assert_eq!(SocketConnect::URL, "/api/v3/socket/connect");
    }

    #[test]
    fn test_handshake_body_is_empty_map() {
        let encoded = to_wire(&SocketConnect).unwrap();
        assert_eq!(encoded, WireValue::Map(Default::default()));
    }
}
