pub mod claims;
pub mod codec;
pub mod errors;
pub mod issuer;

pub use claims::Claims;
pub use claims::InvitePayload;
pub use claims::MailIdentityPayload;
pub use claims::RefreshPayload;
pub use claims::TokenIdentity;
pub use claims::TokenKind;
pub use claims::TokenPayload;
pub use codec::SignedToken;
pub use codec::TokenCodec;
pub use errors::TokenError;
pub use issuer::refresh_ttl;
pub use issuer::TokenIssuer;
