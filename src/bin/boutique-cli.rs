#![forbid(unsafe_code)]
use anyhow::{bail, Result};
use boutique::{
    announce::{self, AnnouncementBook, AnnouncementKind, AnnouncementPatch},
    io,
    model::StaffLog,
    monitor::{self, StatusMonitor},
    notification::{self, DiscordNotifier, Notifier, NullNotifier},
    recruitment::{self, ApplicationId, ApplicationLedger, Decision},
    settings::{self, keys, JsonSettingsStore, SettingsStore},
    staff::{CheckinAction, CheckinBoard},
    status,
    storage::{JsonStorage, Storage},
};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI minimaliste de pilotage de la boutique (sans base de données)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON des réglages
    #[arg(long, global = true, default_value = "settings.json")]
    settings: String,

    /// Répertoire des journaux (staff, candidatures, annonces)
    #[arg(long, global = true, default_value = ".")]
    data: String,

    /// URL du webhook Discord (sinon variable BOUTIQUE_WEBHOOK_URL)
    #[arg(long, global = true)]
    webhook_url: Option<String>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Afficher le statut courant (ouvert/fermé + raison)
    Status,

    /// Afficher les réglages effectifs
    Show,

    /// Configurer un shift ("morning" ou "evening")
    SetShift {
        #[arg(long)]
        shift: String,
        /// "HH:MM"
        #[arg(long)]
        start: Option<String>,
        /// "HH:MM"
        #[arg(long)]
        end: Option<String>,
        /// "on" ou "off"
        #[arg(long)]
        enabled: Option<String>,
    },

    /// Basculer le mode vacances
    Vacation {
        /// "on" ou "off"
        #[arg(long)]
        mode: String,
        #[arg(long)]
        message: Option<String>,
    },

    /// Définir le message libre joint aux notifications
    Message {
        #[arg(long)]
        text: String,
    },

    /// Définir le décalage horaire mural (heures par rapport à UTC)
    Offset {
        #[arg(long)]
        hours: i8,
    },

    /// Envoyer le statut courant sur le webhook (envoi manuel)
    Notify,

    /// Une passe planifiée : envoi si la minute tombe sur une borne de shift
    Tick,

    /// Boucle de surveillance (transitions + bornes)
    Watch {
        #[arg(long, default_value_t = 60)]
        interval_secs: u64,
    },

    /// Importer des membres du staff depuis un CSV
    ImportStaff {
        #[arg(long)]
        csv: String,
    },

    /// Prise de service d'un membre
    Checkin {
        #[arg(long)]
        handle: String,
    },

    /// Fin de service d'un membre
    Checkout {
        #[arg(long)]
        handle: String,
    },

    /// Lister le staff actuellement en service
    Staff,

    /// Exporter le journal de pointage en CSV
    ExportCheckins {
        #[arg(long)]
        out: String,
    },

    /// Déposer une candidature
    Apply {
        #[arg(long)]
        account: String,
        #[arg(long)]
        character: String,
        #[arg(long)]
        discord: String,
    },

    /// Trancher une candidature en attente
    Process {
        #[arg(long)]
        id: String,
        /// "accept" ou "reject"
        #[arg(long)]
        decision: String,
        /// Rôle attribué (requis pour accepter)
        #[arg(long)]
        role: Option<String>,
        /// Admin décideur
        #[arg(long)]
        by: String,
    },

    /// Lister les candidatures (en attente par défaut)
    Applications {
        #[arg(long)]
        all: bool,
    },

    /// Publier une annonce
    Announce {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        /// info | success | warning | error
        #[arg(long, default_value = "info")]
        kind: String,
        #[arg(long)]
        by: String,
        /// Expiration RFC3339 (optionnelle)
        #[arg(long)]
        expires: Option<String>,
    },

    /// Lister les annonces (visibles par défaut)
    Announcements {
        #[arg(long)]
        all: bool,
    },

    /// Modifier une annonce
    EditAnnouncement {
        #[arg(long)]
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
        /// info | success | warning | error
        #[arg(long)]
        kind: Option<String>,
        /// "on" ou "off"
        #[arg(long)]
        active: Option<String>,
        /// Expiration RFC3339
        #[arg(long)]
        expires: Option<String>,
        /// Supprimer l'expiration
        #[arg(long)]
        clear_expiry: bool,
    },

    /// Supprimer une annonce
    DeleteAnnouncement {
        #[arg(long)]
        id: String,
    },
}

fn parse_flag(raw: &str) -> Result<bool> {
    settings::parse_bool(raw).ok_or_else(|| anyhow::anyhow!("expected on/off, got: {raw}"))
}

fn parse_kind(raw: &str) -> Result<AnnouncementKind> {
    AnnouncementKind::parse(raw)
        .ok_or_else(|| anyhow::anyhow!("unknown announcement kind: {raw}"))
}

fn parse_expiry(raw: &str) -> Result<DateTime<Utc>> {
    Ok(raw.parse()?)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let settings_store = JsonSettingsStore::open(&cli.settings)?;
    let webhook_url = cli
        .webhook_url
        .clone()
        .or_else(|| std::env::var("BOUTIQUE_WEBHOOK_URL").ok());
    let notifier: Box<dyn Notifier> = match &webhook_url {
        Some(url) => Box::new(DiscordNotifier::new(url.clone())?),
        None => Box::new(NullNotifier),
    };

    let data_dir = PathBuf::from(&cli.data);
    let staff_storage: JsonStorage<StaffLog> = JsonStorage::open(data_dir.join("staff.json"))?;
    let ledger_storage: JsonStorage<ApplicationLedger> =
        JsonStorage::open(data_dir.join("applications.json"))?;
    let book_storage: JsonStorage<AnnouncementBook> =
        JsonStorage::open(data_dir.join("announcements.json"))?;

    let code = match cli.cmd {
        Commands::Status => {
            let config = settings::load_store_config(&settings_store);
            let now = Utc::now();
            let minute = monitor::local_minute(now, config.utc_offset_hours);
            let current = status::evaluate(minute, &config);
            let state = if current.open { "ouvert" } else { "fermé" };
            println!("{state} ({})", current.reason.label());
            0
        }
        Commands::Show => {
            let config = settings::load_store_config(&settings_store);
            for setting in settings::config_to_settings(&config) {
                println!("{} = {}", setting.key, setting.value);
            }
            0
        }
        Commands::SetShift {
            shift,
            start,
            end,
            enabled,
        } => {
            let (start_key, end_key, enabled_key) = match shift.as_str() {
                "morning" => (keys::MORNING_START, keys::MORNING_END, keys::MORNING_ENABLED),
                "evening" => (keys::EVENING_START, keys::EVENING_END, keys::EVENING_ENABLED),
                other => bail!("unknown shift: {other} (expected morning|evening)"),
            };
            if let Some(start) = start {
                if status::parse_hhmm(&start).is_none() {
                    bail!("invalid time: {start} (expected HH:MM)");
                }
                settings_store.upsert(start_key, &start)?;
            }
            if let Some(end) = end {
                if status::parse_hhmm(&end).is_none() {
                    bail!("invalid time: {end} (expected HH:MM)");
                }
                settings_store.upsert(end_key, &end)?;
            }
            if let Some(enabled) = enabled {
                let flag = parse_flag(&enabled)?;
                settings_store.upsert(enabled_key, &flag.to_string())?;
            }
            0
        }
        Commands::Vacation { mode, message } => {
            let active = parse_flag(&mode)?;
            settings_store.upsert(keys::VACATION_MODE, &active.to_string())?;
            if let Some(message) = message {
                settings_store.upsert(keys::VACATION_MESSAGE, &message)?;
            }
            0
        }
        Commands::Message { text } => {
            settings_store.upsert(keys::DISCORD_MESSAGE, &text)?;
            0
        }
        Commands::Offset { hours } => {
            settings_store.upsert(keys::UTC_OFFSET, &hours.clamp(-12, 14).to_string())?;
            0
        }
        Commands::Notify => {
            let config = settings::load_store_config(&settings_store);
            let now = Utc::now();
            let minute = monitor::local_minute(now, config.utc_offset_hours);
            let current = status::evaluate(minute, &config);
            notification::dispatch(
                notifier.as_ref(),
                notification::status_embed(&current, &config, now),
            );
            println!("notification envoyée ({})", current.reason.label());
            0
        }
        Commands::Tick => {
            let config = settings::load_store_config(&settings_store);
            if config.vacation.active {
                println!("ignoré (mode vacances)");
            } else {
                match monitor::scheduled_pass(&settings_store, notifier.as_ref(), Utc::now()) {
                    Some(true) => println!("envoyé : ouverture"),
                    Some(false) => println!("envoyé : fermeture"),
                    None => println!("ignoré (hors borne de shift)"),
                }
            }
            0
        }
        Commands::Watch { interval_secs } => {
            let mut watcher = StatusMonitor::new(&settings_store, notifier.as_ref());
            watcher.watch(Duration::from_secs(interval_secs));
        }
        Commands::ImportStaff { csv } => {
            let members = io::import_staff_csv(csv)?;
            let mut board = CheckinBoard::from(staff_storage.load_or_default()?);
            println!("{} membre(s) importé(s)", members.len());
            board.add_members(members);
            staff_storage.save(board.log())?;
            0
        }
        Commands::Checkin { handle } => {
            let config = settings::load_store_config(&settings_store);
            let mut board = CheckinBoard::from(staff_storage.load_or_default()?);
            let now = Utc::now();
            let id = board.check_in(&handle, now)?;
            staff_storage.save(board.log())?;
            let who = board
                .log()
                .find_member_by_id(&id)
                .map(|m| m.display_name.clone())
                .unwrap_or_else(|| handle.clone());
            notification::dispatch(
                notifier.as_ref(),
                board.summary_embed(&who, CheckinAction::In, now, config.utc_offset_hours),
            );
            println!("{who} en service");
            0
        }
        Commands::Checkout { handle } => {
            let config = settings::load_store_config(&settings_store);
            let mut board = CheckinBoard::from(staff_storage.load_or_default()?);
            let now = Utc::now();
            let id = board.check_out(&handle, now)?;
            staff_storage.save(board.log())?;
            let who = board
                .log()
                .find_member_by_id(&id)
                .map(|m| m.display_name.clone())
                .unwrap_or_else(|| handle.clone());
            notification::dispatch(
                notifier.as_ref(),
                board.summary_embed(&who, CheckinAction::Out, now, config.utc_offset_hours),
            );
            println!("{who} hors service");
            0
        }
        Commands::Staff => {
            let config = settings::load_store_config(&settings_store);
            let board = CheckinBoard::from(staff_storage.load_or_default()?);
            for (member, record) in board.active() {
                println!(
                    "{} | {} | depuis {}",
                    member.handle,
                    member.display_name,
                    monitor::local_hhmm(record.checked_in_at, config.utc_offset_hours)
                );
            }
            0
        }
        Commands::ExportCheckins { out } => {
            let board = CheckinBoard::from(staff_storage.load_or_default()?);
            io::export_checkins_csv(out, board.log())?;
            0
        }
        Commands::Apply {
            account,
            character,
            discord,
        } => {
            let mut ledger = ledger_storage.load_or_default()?;
            let id = ledger.submit(account, character, discord, Utc::now());
            ledger_storage.save(&ledger)?;
            println!("candidature déposée : {}", id.as_str());
            0
        }
        Commands::Process {
            id,
            decision,
            role,
            by,
        } => {
            let decision = match decision.as_str() {
                "accept" => match role {
                    Some(role) => Decision::Accept { role },
                    None => bail!("--role is required to accept"),
                },
                "reject" => Decision::Reject,
                other => bail!("unknown decision: {other} (expected accept|reject)"),
            };
            let mut ledger = ledger_storage.load_or_default()?;
            let now = Utc::now();
            let application = ledger.process(&ApplicationId::new(&id), decision, &by, now)?;
            let embed = recruitment::decision_embed(application, now);
            let discord_handle = application.discord_handle.clone();
            ledger_storage.save(&ledger)?;
            notification::dispatch(notifier.as_ref(), embed);
            println!("candidature de {discord_handle} traitée");
            0
        }
        Commands::Applications { all } => {
            let ledger = ledger_storage.load_or_default()?;
            let shown: Vec<_> = if all {
                ledger.applications.iter().collect()
            } else {
                ledger.pending().collect()
            };
            for application in shown {
                println!(
                    "{} | {} | {} | {:?}",
                    application.id.as_str(),
                    application.discord_handle,
                    application.submitted_at.to_rfc3339(),
                    application.status
                );
            }
            0
        }
        Commands::Announce {
            title,
            content,
            kind,
            by,
            expires,
        } => {
            let kind = parse_kind(&kind)?;
            let expires_at = expires.as_deref().map(parse_expiry).transpose()?;
            let mut book = book_storage.load_or_default()?;
            let created = book.create(title, content, kind, expires_at, by, Utc::now());
            let embed = announce::announcement_embed(created);
            let id = created.id.clone();
            book_storage.save(&book)?;
            notification::dispatch(notifier.as_ref(), embed);
            println!("annonce publiée : {id}");
            0
        }
        Commands::Announcements { all } => {
            let book = book_storage.load_or_default()?;
            let shown = if all {
                book.list()
            } else {
                book.active_now(Utc::now())
            };
            for announcement in shown {
                println!(
                    "{} | {} | {} | {}",
                    announcement.id,
                    announcement.kind.as_str(),
                    if announcement.active { "active" } else { "inactive" },
                    announcement.title
                );
            }
            0
        }
        Commands::EditAnnouncement {
            id,
            title,
            content,
            kind,
            active,
            expires,
            clear_expiry,
        } => {
            let kind = kind.as_deref().map(parse_kind).transpose()?;
            let active = active.as_deref().map(parse_flag).transpose()?;
            let expires_at = if clear_expiry {
                Some(None)
            } else {
                expires.as_deref().map(parse_expiry).transpose()?.map(Some)
            };
            let mut book = book_storage.load_or_default()?;
            book.update(
                &id,
                AnnouncementPatch {
                    title,
                    content,
                    kind,
                    active,
                    expires_at,
                },
            )?;
            book_storage.save(&book)?;
            0
        }
        Commands::DeleteAnnouncement { id } => {
            let mut book = book_storage.load_or_default()?;
            book.remove(&id)?;
            book_storage.save(&book)?;
            0
        }
    };

    std::process::exit(code);
}
