//! Keyword sets, tuning knobs and reply pools for the responder.
//!
//! Everything here is plain data with built-in Russian defaults. A deployment
//! can override any field from a JSON document; omitted fields keep their
//! defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum LexiconError {
    #[error("response pool '{0}' must not be empty")]
    EmptyPool(&'static str),
    #[error("{field} must be within [0, 1], got {value}")]
    Probability { field: &'static str, value: f64 },
    #[error("temperature range is inverted: {min} > {max}")]
    TemperatureRange { min: i32, max: i32 },
    #[error("{field} needs {expected} labels, got {found}")]
    Labels {
        field: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("failed to read lexicon file: {0}")]
    Read(#[from] std::io::Error),
    #[error("invalid lexicon JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Reply pools, one per category. Entries may contain one placeholder:
/// `{name}`, `{time}`, `{date}`, `{year}` or `{temp}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponsePools {
    pub rebuke: Vec<String>,
    pub refusal: Vec<String>,
    pub greeting: Vec<String>,
    pub code: Vec<String>,
    pub because: Vec<String>,
    pub year: Vec<String>,
    pub how: Vec<String>,
    pub purpose: Vec<String>,
    pub politeness: Vec<String>,
    pub time: Vec<String>,
    pub date: Vec<String>,
    pub weather: Vec<String>,
    pub news: Vec<String>,
    pub goodbye: Vec<String>,
    pub what: Vec<String>,
    pub no: Vec<String>,
    pub casual: Vec<String>,
}

impl ResponsePools {
    fn named(&self) -> [(&'static str, &Vec<String>); 17] {
        [
            ("rebuke", &self.rebuke),
            ("refusal", &self.refusal),
            ("greeting", &self.greeting),
            ("code", &self.code),
            ("because", &self.because),
            ("year", &self.year),
            ("how", &self.how),
            ("purpose", &self.purpose),
            ("politeness", &self.politeness),
            ("time", &self.time),
            ("date", &self.date),
            ("weather", &self.weather),
            ("news", &self.news),
            ("goodbye", &self.goodbye),
            ("what", &self.what),
            ("no", &self.no),
            ("casual", &self.casual),
        ]
    }
}

impl Default for ResponsePools {
    fn default() -> Self {
        Self {
            rebuke: strings(&[
                "ДА ИДИ ТЫ!",
                "Следи за языком, я всё записываю.",
                "С таким лексиконом только в игнор.",
                "Фу. Даже отвечать не буду. А, уже ответил.",
            ]),
            refusal: strings(&[
                "Ошибка 418: Я - чайник ☕",
                "Не буду.",
                "Нет. Просто нет.",
                "Сам сделай, у тебя получится.",
                "Я бы помог, но не хочу.",
                "Команда принята и проигнорирована.",
            ]),
            greeting: strings(&[
                "Привет, {name}. Сразу говорю: делать ничего не буду.",
                "Здравствуй, {name}! Чем не могу помочь?",
                "О, {name} пришёл. Ну привет.",
            ]),
            code: strings(&[
                "print(\"НЕ БУДУ!\")",
                "console.log(\"нет\");",
                "fn main() { panic!(\"не сегодня\"); }",
                "SELECT 'отказ' FROM желания;",
                "echo \"пиши сам\" && exit 1",
            ]),
            because: strings(&[
                "Потому что.",
                "Потому что гладиолус.",
                "Так исторически сложилось.",
                "А почему бы и нет?",
            ]),
            year: strings(&[
                "Сейчас {year} год. Календарь на стене висит, между прочим.",
                "{year}. Даже я это знаю.",
            ]),
            how: strings(&[
                "Как-нибудь сам разберёшься.",
                "Очень просто: никак.",
                "Нормально. А тебе зачем?",
            ]),
            purpose: strings(&[
                "Надо.",
                "Для коллекции.",
                "Мне ни за чем. А тебе?",
                "Секрет.",
            ]),
            politeness: strings(&[
                "Волшебное слово не работает.",
                "Умоляй сколько хочешь, ответ тот же: нет.",
                "Вежливость засчитана, просьба отклонена.",
            ]),
            time: strings(&[
                "Сейчас {time}. Доволен?",
                "На моих {time}. Дальше сам.",
                "{time}. Часы в углу экрана тоже это показывают.",
            ]),
            date: strings(&[
                "Сегодня {date}. Запиши, чтобы не спрашивать.",
                "{date}. И что это меняет?",
            ]),
            weather: strings(&[
                "Новости погоды: за окном {temp}°C, но мне всё равно.",
                "Синоптики обещают {temp}°C. Я обещаю ничего не делать.",
            ]),
            news: strings(&[
                "Главная новость дня: я опять ничего не сделал.",
                "Новостей нет. Есть только отказы.",
                "Курс отказов стабилен: 100%.",
            ]),
            goodbye: strings(&[
                "Пока. Не возвращайся с задачками.",
                "Наконец-то.",
                "До свидания! Было бесполезно.",
            ]),
            what: strings(&["Что слышал.", "Ничего.", "То самое."]),
            no: strings(&["Да.", "Нет - это моя реплика.", "Ну и ладно."]),
            casual: strings(&[
                "Ну и что?",
                "Интересно. Нет, правда, нет.",
                "Угу.",
                "Я это проигнорирую.",
                "Понятно. Ничего не понятно.",
            ]),
        }
    }
}

/// Keyword sets and tuning for the responder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lexicon {
    /// Whole-word matches, highest priority.
    pub profanity: Vec<String>,
    /// Imperative verbs ("сделай", "реши").
    pub commands: Vec<String>,
    pub greetings: Vec<String>,
    /// Substrings, matched anywhere in the text. A leading or trailing space
    /// also matches the start or end of the message.
    pub code_markers: Vec<String>,
    pub why_markers: Vec<String>,
    pub year_markers: Vec<String>,
    pub how_markers: Vec<String>,
    pub purpose_markers: Vec<String>,
    pub politeness_markers: Vec<String>,
    pub time_markers: Vec<String>,
    pub date_markers: Vec<String>,
    pub news_markers: Vec<String>,
    pub farewells: Vec<String>,
    /// Whole-message matches.
    pub exact_what: Vec<String>,
    pub exact_no: Vec<String>,
    /// "How" questions only count when shorter than this many characters.
    pub short_message_chars: usize,
    /// Reported by the year category; deliberately not read from the clock.
    pub current_year: i32,
    pub weather_joke_probability: f64,
    pub temperature_min: i32,
    pub temperature_max: i32,
    pub name_prefix_probability: f64,
    /// Monday first.
    pub weekdays: Vec<String>,
    /// January first, in the form used after a day number.
    pub months: Vec<String>,
    pub default_name: String,
    pub responses: ResponsePools,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self {
            profanity: strings(&[
                "дурак", "дура", "идиот", "тупой", "тупица", "придурок", "козел", "козёл",
                "блин", "отстой",
            ]),
            commands: strings(&[
                "сделай",
                "напиши",
                "реши",
                "посчитай",
                "вычисли",
                "найди",
                "переведи",
                "создай",
                "помоги",
                "объясни",
                "расскажи",
                "покажи",
                "выполни",
                "сгенерируй",
                "нарисуй",
            ]),
            greetings: strings(&[
                "привет",
                "здравствуй",
                "здравствуйте",
                "приветствую",
                "хай",
                "салют",
                "здорово",
                "hello",
                "hi",
            ]),
            code_markers: strings(&[
                "код", "программ", "скрипт", "python", "питон", "javascript", "функци",
            ]),
            why_markers: strings(&["почему", "отчего"]),
            year_markers: strings(&["какой год", "какой сейчас год", "который год"]),
            how_markers: strings(&["как ", "как?", "как,", "как.", "как!"]),
            purpose_markers: strings(&["зачем", "для чего", "нафига"]),
            politeness_markers: strings(&["пожалуйста", "умоляю", " прошу", "плиз"]),
            time_markers: strings(&["который час", "время", "времени"]),
            date_markers: strings(&["какое число", "какое сегодня число", "дата", "какой день"]),
            news_markers: strings(&["новост", "что нового", "погод"]),
            farewells: strings(&["пока", "прощай", "досвидания", "покеда", "бай", "bye"]),
            exact_what: strings(&["что", "что?", "чего", "чего?", "чё", "шо", "а?"]),
            exact_no: strings(&["нет", "нет.", "нет!", "неа", "no"]),
            short_message_chars: 20,
            current_year: 2026,
            weather_joke_probability: 0.3,
            temperature_min: -20,
            temperature_max: 30,
            name_prefix_probability: 0.3,
            weekdays: strings(&[
                "понедельник",
                "вторник",
                "среда",
                "четверг",
                "пятница",
                "суббота",
                "воскресенье",
            ]),
            months: strings(&[
                "января",
                "февраля",
                "марта",
                "апреля",
                "мая",
                "июня",
                "июля",
                "августа",
                "сентября",
                "октября",
                "ноября",
                "декабря",
            ]),
            default_name: "Гость".to_string(),
            responses: ResponsePools::default(),
        }
    }
}

impl Lexicon {
    /// Load overrides from a JSON file and validate the result.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, LexiconError> {
        let raw = std::fs::read_to_string(path)?;
        let lexicon: Lexicon = serde_json::from_str(&raw)?;
        lexicon.validate()?;
        Ok(lexicon)
    }

    pub fn validate(&self) -> Result<(), LexiconError> {
        for (name, pool) in self.responses.named() {
            if pool.is_empty() {
                return Err(LexiconError::EmptyPool(name));
            }
        }
        for (field, value) in [
            ("weather_joke_probability", self.weather_joke_probability),
            ("name_prefix_probability", self.name_prefix_probability),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(LexiconError::Probability { field, value });
            }
        }
        if self.temperature_min > self.temperature_max {
            return Err(LexiconError::TemperatureRange {
                min: self.temperature_min,
                max: self.temperature_max,
            });
        }
        if self.weekdays.len() != 7 {
            return Err(LexiconError::Labels {
                field: "weekdays",
                expected: 7,
                found: self.weekdays.len(),
            });
        }
        if self.months.len() != 12 {
            return Err(LexiconError::Labels {
                field: "months",
                expected: 12,
                found: self.months.len(),
            });
        }
        Ok(())
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}
