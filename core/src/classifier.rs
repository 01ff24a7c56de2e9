//! Rule-based reply engine.
//!
//! A message is normalized, then checked against an ordered rule table. The
//! first rule that matches decides the reply pool and whether the exchange
//! counts as a refusal. Messages that match nothing get a casual reply.

use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::lexicon::{Lexicon, LexiconError};
use crate::normalize::{NormalizedText, normalize};
use crate::random::RandomSource;

/// Message category, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Profanity,
    Command,
    Greeting,
    CodeRequest,
    Why,
    Year,
    ShortHow,
    Purpose,
    Politeness,
    Time,
    Date,
    News,
    Farewell,
    What,
    No,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Profanity => "profanity",
            Category::Command => "command",
            Category::Greeting => "greeting",
            Category::CodeRequest => "code_request",
            Category::Why => "why",
            Category::Year => "year",
            Category::ShortHow => "short_how",
            Category::Purpose => "purpose",
            Category::Politeness => "politeness",
            Category::Time => "time",
            Category::Date => "date",
            Category::News => "news",
            Category::Farewell => "farewell",
            Category::What => "what",
            Category::No => "no",
        }
    }
}

/// How a rule inspects a normalized message.
#[derive(Debug, Clone, PartialEq)]
pub enum Matcher {
    /// Some word equals one of the entries.
    AnyWord(Vec<String>),
    /// The text contains one of the entries as a substring.
    Contains(Vec<String>),
    /// Like `Contains`, but only for messages shorter than `max_chars`.
    ContainsShort {
        markers: Vec<String>,
        max_chars: usize,
    },
    /// The whole text equals one of the entries.
    Exact(Vec<String>),
}

impl Matcher {
    pub fn matches(&self, message: &NormalizedText) -> bool {
        match self {
            Matcher::AnyWord(words) => message.has_word(words),
            Matcher::Contains(markers) => message.contains_any(markers),
            Matcher::ContainsShort { markers, max_chars } => {
                message.contains_any(markers) && message.char_len() < *max_chars
            }
            Matcher::Exact(candidates) => message.equals_any(candidates),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub category: Category,
    pub matcher: Matcher,
    pub refusal: bool,
}

/// Outcome of [`Responder::classify`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationResult {
    pub reply: String,
    pub is_refusal: bool,
    /// `None` when the message fell through to the casual fallback.
    pub matched_category: Option<Category>,
}

/// Immutable rule table plus the lexicon it was built from.
///
/// Holds no mutable state, so one instance can be shared across request
/// handlers behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Responder {
    rules: Vec<Rule>,
    lexicon: Lexicon,
}

impl Default for Responder {
    fn default() -> Self {
        Self::from_valid(Lexicon::default())
    }
}

impl Responder {
    pub fn new(lexicon: Lexicon) -> Result<Self, LexiconError> {
        lexicon.validate()?;
        Ok(Self::from_valid(lexicon))
    }

    fn from_valid(lexicon: Lexicon) -> Self {
        let rules = build_rules(&lexicon);
        Self { rules, lexicon }
    }

    /// Rules in evaluation order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn default_name(&self) -> &str {
        &self.lexicon.default_name
    }

    /// First rule matching `message`, if any.
    pub fn match_rule(&self, message: &NormalizedText) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.matcher.matches(message))
    }

    /// Reply pool for a category; `None` selects the casual fallback pool.
    /// The news category reports its regular pool, not the weather jokes.
    pub fn pool(&self, category: Option<Category>) -> &[String] {
        let pools = &self.lexicon.responses;
        let Some(category) = category else {
            return &pools.casual;
        };
        match category {
            Category::Profanity => &pools.rebuke,
            Category::Command => &pools.refusal,
            Category::Greeting => &pools.greeting,
            Category::CodeRequest => &pools.code,
            Category::Why => &pools.because,
            Category::Year => &pools.year,
            Category::ShortHow => &pools.how,
            Category::Purpose => &pools.purpose,
            Category::Politeness => &pools.politeness,
            Category::Time => &pools.time,
            Category::Date => &pools.date,
            Category::News => &pools.news,
            Category::Farewell => &pools.goodbye,
            Category::What => &pools.what,
            Category::No => &pools.no,
        }
    }

    /// Pick a reply for `message`.
    ///
    /// A blank `display_name` is replaced by the configured default. Never
    /// fails: anything that matches no rule gets a casual reply.
    pub fn classify<R>(
        &self,
        message: &str,
        display_name: &str,
        now: NaiveDateTime,
        rng: &mut R,
    ) -> ClassificationResult
    where
        R: RandomSource + ?Sized,
    {
        let normalized = normalize(message);
        let name = match display_name.trim() {
            "" => self.lexicon.default_name.as_str(),
            trimmed => trimmed,
        };

        let Some(rule) = self.match_rule(&normalized) else {
            return ClassificationResult {
                reply: self.fallback_reply(name, now, rng),
                is_refusal: false,
                matched_category: None,
            };
        };

        let reply = match rule.category {
            Category::News => self.news_reply(name, now, rng),
            category => {
                let template = choose(self.pool(Some(category)), rng);
                self.render(template, name, now)
            }
        };

        ClassificationResult {
            reply,
            is_refusal: rule.refusal,
            matched_category: Some(rule.category),
        }
    }

    fn news_reply<R>(&self, name: &str, now: NaiveDateTime, rng: &mut R) -> String
    where
        R: RandomSource + ?Sized,
    {
        if rng.next_unit() < self.lexicon.weather_joke_probability {
            let template = choose(&self.lexicon.responses.weather, rng);
            let temp = rng.int_in_range(self.lexicon.temperature_min, self.lexicon.temperature_max);
            self.render(template, name, now)
                .replace("{temp}", &temp.to_string())
        } else {
            let template = choose(&self.lexicon.responses.news, rng);
            self.render(template, name, now)
        }
    }

    fn fallback_reply<R>(&self, name: &str, now: NaiveDateTime, rng: &mut R) -> String
    where
        R: RandomSource + ?Sized,
    {
        let address_by_name = rng.next_unit() < self.lexicon.name_prefix_probability;
        let reply = self.render(choose(&self.lexicon.responses.casual, rng), name, now);
        if address_by_name {
            format!("{name}, {}", reply.to_lowercase())
        } else {
            reply
        }
    }

    fn render(&self, template: &str, name: &str, now: NaiveDateTime) -> String {
        let mut reply = template.replace("{name}", name);
        if reply.contains("{time}") {
            reply = reply.replace("{time}", &now.format("%H:%M").to_string());
        }
        if reply.contains("{date}") {
            reply = reply.replace("{date}", &self.long_date(now));
        }
        if reply.contains("{year}") {
            reply = reply.replace("{year}", &self.lexicon.current_year.to_string());
        }
        reply
    }

    /// "понедельник, 23 февраля 2026"
    pub fn long_date(&self, now: NaiveDateTime) -> String {
        let weekday = &self.lexicon.weekdays[now.weekday().num_days_from_monday() as usize];
        let month = &self.lexicon.months[now.month0() as usize];
        format!("{weekday}, {} {month} {}", now.day(), now.year())
    }
}

fn build_rules(lexicon: &Lexicon) -> Vec<Rule> {
    let rule = |category, matcher, refusal| Rule {
        category,
        matcher,
        refusal,
    };

    vec![
        rule(Category::Profanity, Matcher::AnyWord(word_set(&lexicon.profanity)), true),
        rule(Category::Command, Matcher::AnyWord(word_set(&lexicon.commands)), true),
        rule(Category::Greeting, Matcher::AnyWord(word_set(&lexicon.greetings)), false),
        rule(Category::CodeRequest, Matcher::Contains(markers(&lexicon.code_markers)), true),
        rule(Category::Why, Matcher::Contains(markers(&lexicon.why_markers)), false),
        rule(Category::Year, Matcher::Contains(markers(&lexicon.year_markers)), false),
        rule(
            Category::ShortHow,
            Matcher::ContainsShort {
                markers: markers(&lexicon.how_markers),
                max_chars: lexicon.short_message_chars,
            },
            false,
        ),
        rule(Category::Purpose, Matcher::Contains(markers(&lexicon.purpose_markers)), false),
        rule(
            Category::Politeness,
            Matcher::Contains(markers(&lexicon.politeness_markers)),
            false,
        ),
        rule(Category::Time, Matcher::Contains(markers(&lexicon.time_markers)), false),
        rule(Category::Date, Matcher::Contains(markers(&lexicon.date_markers)), false),
        rule(Category::News, Matcher::Contains(markers(&lexicon.news_markers)), false),
        rule(Category::Farewell, Matcher::AnyWord(word_set(&lexicon.farewells)), false),
        rule(Category::What, Matcher::Exact(word_set(&lexicon.exact_what)), false),
        rule(Category::No, Matcher::Exact(word_set(&lexicon.exact_no)), false),
    ]
}

// Substring markers keep their edge spaces; they mark word boundaries.
fn markers(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|v| v.to_lowercase())
        .filter(|v| !v.trim().is_empty())
        .collect()
}

fn word_set(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
        .collect()
}

fn choose<'a, R>(pool: &'a [String], rng: &mut R) -> &'a str
where
    R: RandomSource + ?Sized,
{
    match pool.len() {
        0 => "",
        len => &pool[rng.pick_index(len)],
    }
}
