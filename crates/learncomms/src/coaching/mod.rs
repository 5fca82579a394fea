//! Message coaching: decode analysis, reply suggestions, rewrite versions,
//! and pronunciation/sentence/email coaching text.

mod compose;
mod decode;
mod pronounce;

pub use compose::{reply_prompt, split_replies, split_versions, writing_prompt, ComposeRequest};
pub use decode::{decode_prompt, parse_decode_reply, DecodedMessage};
pub use pronounce::{pronounce_prompt, PronounceMode};
