pub mod core;
pub mod finnhub;
pub mod mock;
pub mod openai;
pub mod repositories;
pub mod telegram;

pub use self::core::{EntropyRandomSource, HttpClientFactory, SeededRandomSource};
pub use finnhub::FinnhubCandleProvider;
pub use openai::OpenAiAdvisoryService;
pub use repositories::{InMemorySettingsRepository, InMemorySignalRepository};
pub use telegram::{LogNotifier, TelegramNotifier};
