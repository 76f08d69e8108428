//! Closed set of language codes accepted by the Whisper backend.

use crate::{Error, ErrorContext};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

macro_rules! languages {
    ($($variant:ident => $code:literal, $name:literal;)*) => {
        /// A Whisper language code. Omitting the language lets the backend auto-detect it.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Language {
            $($variant,)*
        }

        impl Language {
            /// Every supported language, in code order.
            pub const ALL: &'static [Language] = &[$(Language::$variant,)*];

            /// Wire value sent as the `language` query parameter.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Language::$variant => $code,)*
                }
            }

            /// English name of the language.
            pub fn name(&self) -> &'static str {
                match self {
                    $(Language::$variant => $name,)*
                }
            }

            pub fn from_code(code: &str) -> Option<Self> {
                match code {
                    $($code => Some(Language::$variant),)*
                    _ => None,
                }
            }
        }
    };
}

languages! {
    Afrikaans => "af", "Afrikaans";
    Amharic => "am", "Amharic";
    Arabic => "ar", "Arabic";
    Assamese => "as", "Assamese";
    Azerbaijani => "az", "Azerbaijani";
    Bashkir => "ba", "Bashkir";
    Belarusian => "be", "Belarusian";
    Bulgarian => "bg", "Bulgarian";
    Bengali => "bn", "Bengali";
    Tibetan => "bo", "Tibetan";
    Breton => "br", "Breton";
    Bosnian => "bs", "Bosnian";
    Catalan => "ca", "Catalan";
    Czech => "cs", "Czech";
    Welsh => "cy", "Welsh";
    Danish => "da", "Danish";
    German => "de", "German";
    Greek => "el", "Greek";
    English => "en", "English";
    Spanish => "es", "Spanish";
    Estonian => "et", "Estonian";
    Basque => "eu", "Basque";
    Persian => "fa", "Persian";
    Finnish => "fi", "Finnish";
    Faroese => "fo", "Faroese";
    French => "fr", "French";
    Galician => "gl", "Galician";
    Gujarati => "gu", "Gujarati";
    Hausa => "ha", "Hausa";
    Hawaiian => "haw", "Hawaiian";
    Hebrew => "he", "Hebrew";
    Hindi => "hi", "Hindi";
    Croatian => "hr", "Croatian";
    HaitianCreole => "ht", "Haitian Creole";
    Hungarian => "hu", "Hungarian";
    Armenian => "hy", "Armenian";
    Indonesian => "id", "Indonesian";
    Icelandic => "is", "Icelandic";
    Italian => "it", "Italian";
    Japanese => "ja", "Japanese";
    Javanese => "jw", "Javanese";
    Georgian => "ka", "Georgian";
    Kazakh => "kk", "Kazakh";
    Khmer => "km", "Khmer";
    Kannada => "kn", "Kannada";
    Korean => "ko", "Korean";
    Latin => "la", "Latin";
    Luxembourgish => "lb", "Luxembourgish";
    Lingala => "ln", "Lingala";
    Lao => "lo", "Lao";
    Lithuanian => "lt", "Lithuanian";
    Latvian => "lv", "Latvian";
    Malagasy => "mg", "Malagasy";
    Maori => "mi", "Maori";
    Macedonian => "mk", "Macedonian";
    Malayalam => "ml", "Malayalam";
    Mongolian => "mn", "Mongolian";
    Marathi => "mr", "Marathi";
    Malay => "ms", "Malay";
    Maltese => "mt", "Maltese";
    Myanmar => "my", "Myanmar";
    Nepali => "ne", "Nepali";
    Dutch => "nl", "Dutch";
    Nynorsk => "nn", "Nynorsk";
    Norwegian => "no", "Norwegian";
    Occitan => "oc", "Occitan";
    Punjabi => "pa", "Punjabi";
    Polish => "pl", "Polish";
    Pashto => "ps", "Pashto";
    Portuguese => "pt", "Portuguese";
    Romanian => "ro", "Romanian";
    Russian => "ru", "Russian";
    Sanskrit => "sa", "Sanskrit";
    Sindhi => "sd", "Sindhi";
    Sinhala => "si", "Sinhala";
    Slovak => "sk", "Slovak";
    Slovenian => "sl", "Slovenian";
    Shona => "sn", "Shona";
    Somali => "so", "Somali";
    Albanian => "sq", "Albanian";
    Serbian => "sr", "Serbian";
    Sundanese => "su", "Sundanese";
    Swedish => "sv", "Swedish";
    Swahili => "sw", "Swahili";
    Tamil => "ta", "Tamil";
    Telugu => "te", "Telugu";
    Tajik => "tg", "Tajik";
    Thai => "th", "Thai";
    Turkmen => "tk", "Turkmen";
    Tagalog => "tl", "Tagalog";
    Turkish => "tr", "Turkish";
    Tatar => "tt", "Tatar";
    Ukrainian => "uk", "Ukrainian";
    Urdu => "ur", "Urdu";
    Uzbek => "uz", "Uzbek";
    Vietnamese => "vi", "Vietnamese";
    Yiddish => "yi", "Yiddish";
    Yoruba => "yo", "Yoruba";
    Cantonese => "yue", "Cantonese";
    Chinese => "zh", "Chinese";
}

impl FromStr for Language {
    type Err = Error;

    /// Accepts a code in any letter case; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::from_code(&s.trim().to_ascii_lowercase()).ok_or_else(|| {
            Error::validation_with_context(
                "unsupported language code",
                ErrorContext::new()
                    .with_field_path("language")
                    .with_details(s.to_string()),
            )
        })
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Language {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
