use std::io::{self, BufRead, Write};

use anyhow::Result;
use bot_logging::bot_warn;
use paperbot_core::{update, Effect, FileRef, Msg, Session};
use paperbot_engine::{
    Deliverer, DeliverySummary, Destination, FetchSettings, FileEntry, Harvester, HarvestResult,
    ReqwestFetcher,
};

use crate::config::BotConfig;
use crate::console::{ConsoleDestination, ConsoleProgress};
use crate::registry::UserRegistry;

/// Console front end: reads requester input line by line and drives the
/// session state machine, executing the effects it asks for.
pub struct App {
    config: BotConfig,
    registry: UserRegistry,
    session: Session,
    fetcher: ReqwestFetcher,
    settings: FetchSettings,
    destination: ConsoleDestination,
    progress: ConsoleProgress,
}

impl App {
    pub fn new(config: BotConfig, registry: UserRegistry) -> Self {
        let settings = FetchSettings {
            base_url: config.base_url.clone(),
            ..FetchSettings::default()
        };
        Self {
            config,
            registry,
            session: Session::new(),
            fetcher: ReqwestFetcher::default(),
            settings,
            destination: ConsoleDestination::new("downloads".into()),
            progress: ConsoleProgress,
        }
    }

    pub async fn run(mut self) -> Result<()> {
        self.registry
            .record(self.config.admin_user_id, Some("operator"), None, None);
        if let Err(err) = self.registry.save() {
            bot_warn!("failed to save user registry: {}", err);
        }

        println!("{}", welcome_text());

        let stdin = io::stdin();
        let mut line = String::new();
        loop {
            print!("> ");
            io::stdout().flush()?;
            line.clear();
            if stdin.lock().read_line(&mut line)? == 0 {
                break;
            }
            let input = line.trim();
            if input.is_empty() {
                continue;
            }
            if !self.handle_line(input).await? {
                break;
            }
        }
        Ok(())
    }

    async fn handle_line(&mut self, input: &str) -> Result<bool> {
        match input {
            "/quit" | "/exit" => return Ok(false),
            "/start" => println!("{}", welcome_text()),
            "/help" => println!("{}", help_text()),
            "/stats" => self.stats(),
            _ if input.starts_with("/announce") => {
                let text = input.trim_start_matches("/announce").trim().to_string();
                self.announce(&text).await;
            }
            "yes" | "confirm" => self.dispatch(Msg::ConfirmReceived).await?,
            "no" | "cancel" => self.dispatch(Msg::CancelReceived).await?,
            _ => self.dispatch(Msg::QueryReceived(input.to_string())).await?,
        }
        Ok(true)
    }

    fn stats(&self) {
        println!("Total users: {}", self.registry.len());
        println!("Users data is stored in: bot_users.json");
    }

    async fn announce(&mut self, text: &str) {
        if text.is_empty() {
            println!("Usage: /announce <your message here>");
            return;
        }
        let ids = self.registry.all_ids();
        let mut sent = 0usize;
        let mut failed = 0usize;
        for id in &ids {
            let notice = format!("Announcement for {id}:\n{text}");
            match self.destination.send_notice(&notice).await {
                Ok(()) => sent += 1,
                Err(err) => {
                    bot_warn!("failed to announce to {}: {}", id, err);
                    failed += 1;
                }
            }
        }
        println!(
            "Announcement sent: {sent}, failed: {failed}, total users: {}",
            ids.len()
        );
    }

    /// Feed one message through the state machine, executing effects and
    /// cycling any follow-up messages back in.
    async fn dispatch(&mut self, msg: Msg) -> Result<()> {
        let mut queue = vec![msg];
        while let Some(msg) = queue.pop() {
            let (session, effects) = update(std::mem::take(&mut self.session), msg);
            self.session = session;
            for effect in effects {
                if let Some(follow_up) = self.run_effect(effect).await? {
                    queue.push(follow_up);
                }
            }
        }
        Ok(())
    }

    async fn run_effect(&mut self, effect: Effect) -> Result<Option<Msg>> {
        match effect {
            Effect::Notify { text } => {
                self.destination.send_notice(&text).await?;
                Ok(None)
            }
            Effect::StartHarvest { query } => {
                println!("Searching for '{query}'...");
                let harvester = Harvester::new(&self.fetcher, self.settings.clone());
                match harvester.harvest(&query).await {
                    Ok(result) => {
                        let description = describe_harvest(&query, &result);
                        let files = result
                            .flat_files
                            .iter()
                            .map(|file| FileRef {
                                name: file.name.clone(),
                                url: file.source_url.clone(),
                            })
                            .collect();
                        Ok(Some(Msg::HarvestReady { files, description }))
                    }
                    Err(err) => Ok(Some(Msg::HarvestFailed {
                        message: err.to_string(),
                    })),
                }
            }
            Effect::StartDelivery { query, files } => {
                let entries: Vec<FileEntry> = files
                    .into_iter()
                    .map(|file| FileEntry {
                        name: file.name,
                        source_url: file.url,
                    })
                    .collect();
                println!("Downloading {} file(s)...", entries.len());
                let deliverer = Deliverer::new(&self.fetcher, self.settings.file_timeout);
                let summary = deliverer
                    .deliver_all(&entries, &query, &self.destination, &self.progress)
                    .await;
                self.destination
                    .send_notice(&format_summary(&query, summary))
                    .await?;
                Ok(Some(Msg::DeliveryFinished))
            }
        }
    }
}

fn welcome_text() -> String {
    [
        "Welcome to the question paper bot.",
        "",
        "Send a query (e.g. \"EST100\", \"CS101\", \"MATH200\") to search for",
        "papers. The bot lists every matching paper and its files, then",
        "downloads them all once you confirm.",
        "",
        "Commands: /help /stats /announce <text> /quit",
    ]
    .join("\n")
}

fn help_text() -> String {
    [
        "Basic usage:",
        "  - Send any query (e.g. \"EST100\") to search for papers.",
        "  - Reply 'yes' to download all listed files, 'no' to cancel.",
        "  - Large files (>50 MB) are provided as direct links instead.",
        "",
        "If no results are found, try a different search term; course",
        "codes work best. If files are not loading, the repository may",
        "be down.",
    ]
    .join("\n")
}

fn describe_harvest(query: &str, result: &HarvestResult) -> String {
    let mut text = format!(
        "Search results for '{}':\nFound {} paper(s) with {} total file(s)\n\n",
        query,
        result.groups.len(),
        result.file_count()
    );
    for (i, group) in result.groups.iter().enumerate() {
        text.push_str(&format!("{}. {}\n", i + 1, group.title));
        text.push_str(&format!("   Files ({}):\n", group.files.len()));
        for file in &group.files {
            text.push_str(&format!("   - {}\n", file.name));
        }
        text.push('\n');
    }
    text.push_str(&format!(
        "{} file(s) ready for download.\n",
        result.file_count()
    ));
    text.push_str("Reply 'yes' to download all files or 'no' to cancel.");
    text
}

fn format_summary(query: &str, summary: DeliverySummary) -> String {
    format!(
        "Download complete.\nSent: {}\nFailed: {} ({} too large)\nTotal files: {}\nSearch query: '{}'",
        summary.sent, summary.failed, summary.too_large, summary.requested, query
    )
}
