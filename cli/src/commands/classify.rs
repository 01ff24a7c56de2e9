use std::path::Path;

use chrono::NaiveDateTime;
use perra_core::clock::{Clock, ZonedClock};
use perra_core::random::{RandomSource, ThreadRandom};
use perra_core::{Lexicon, Responder};
use serde_json::json;

use crate::util::{print_json, usage_error};

/// Run the reply engine in-process. Nothing is counted.
pub fn run(message: &str, name: Option<&str>, timezone: &str, lexicon: Option<&Path>) -> i32 {
    let Some(clock) = ZonedClock::from_name(timezone) else {
        return usage_error(
            &format!("Unknown timezone '{timezone}'"),
            Some("Use an IANA name such as Europe/Moscow."),
        );
    };

    let lexicon = match lexicon {
        Some(path) => match Lexicon::from_json_file(path) {
            Ok(lexicon) => lexicon,
            Err(e) => {
                return usage_error(
                    &format!("Failed to load lexicon '{}': {e}", path.display()),
                    None,
                );
            }
        },
        None => Lexicon::default(),
    };
    let responder = match Responder::new(lexicon) {
        Ok(responder) => responder,
        Err(e) => return usage_error(&format!("Invalid lexicon: {e}"), None),
    };

    let output = classify(
        &responder,
        message,
        name.unwrap_or_default(),
        clock.now(),
        &mut ThreadRandom,
    );
    print_json(&output);
    0
}

fn classify<R>(
    responder: &Responder,
    message: &str,
    name: &str,
    now: NaiveDateTime,
    rng: &mut R,
) -> serde_json::Value
where
    R: RandomSource + ?Sized,
{
    let result = responder.classify(message, name, now, rng);
    json!({
        "reply": result.reply,
        "is_refusal": result.is_refusal,
        "category": result.matched_category.map(|c| c.as_str()),
    })
}
