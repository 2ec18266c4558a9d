use std::collections::BTreeMap;
use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::{bail, Context};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use colored::Colorize;
use esf_state::{
    Academy, AppConfig, Confirm, Confirmation, ContentType, Deletion, Lesson, MediaAsset,
    MediaRecord, NewUser, PostDraft, Upsert, User, UserRole,
};
use esf_types::{ExerciseResult, PostContent};

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let mut config = AppConfig::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    if let Some(dir) = cli.data_dir {
        config = config.with_data_dir(dir);
    }
    let mut academy = Academy::open_local(config)?;

    match cli.command {
        Command::Signup(args) => cmd_signup(&mut academy, args)?,
        Command::Login(args) => {
            let user = academy.sign_in(&args.email)?;
            println!("{} Signed in as {} ({})", "✓".green().bold(), user.name.bold(), user.role);
        }
        Command::Logout => {
            academy.sign_out();
            println!("{} Signed out.", "✓".green());
        }
        Command::Whoami => cmd_whoami(&academy),
        Command::Feed(args) => cmd_feed(&mut academy, args),
        Command::Post(args) => cmd_post(&mut academy, args)?,
        Command::Like(args) => {
            let liked = academy.toggle_like(&args.post_id)?;
            let verb = if liked { "Liked" } else { "Unliked" };
            println!("{} {} {}", "✓".green(), verb, args.post_id.yellow());
        }
        Command::Comment(args) => {
            let comment = academy.add_comment(&args.post_id, &args.text).await?;
            println!("{} Comment {} added.", "✓".green(), comment.id.dimmed());
        }
        Command::Lessons => cmd_lessons(&academy),
        Command::LessonPut(args) => cmd_lesson_put(&mut academy, &args.file)?,
        Command::LessonRm(args) => {
            let outcome = academy.delete_lesson(&args.id, &confirmer(args.yes))?;
            report_deletion("Lesson", &args.id, outcome);
        }
        Command::CompleteTest(args) => cmd_complete_test(&mut academy, args)?,
        Command::CompletePractice(args) => cmd_complete_practice(&mut academy, args)?,
        Command::CompleteArticle(args) => {
            academy.record_article_completion(&args.lesson_id)?;
            println!("{} Article {} marked as read.", "✓".green(), args.lesson_id.yellow());
        }
        Command::MediaAdd(args) => cmd_media_add(&mut academy, args).await?,
        Command::MediaRm(args) => {
            let outcome = academy
                .delete_media_asset(&args.id, &confirmer(args.yes))
                .await?;
            report_deletion("Media", &args.id, outcome);
        }
        Command::MediaLs(args) => cmd_media_ls(&academy, args).await?,
        Command::Theme => {
            let mode = if academy.toggle_theme() { "dark" } else { "light" };
            println!("Theme: {}", mode.bold());
        }
        Command::Tip => {
            let mut board = academy.start_tip_board();
            board.settled().await;
            let tip = board.current();
            println!("{} {}", "💡".yellow(), tip.text);
            for source in &tip.sources {
                println!("  {} {}", source.title.dimmed(), source.uri.blue());
            }
        }
    }

    for slice in academy.lagging_slices() {
        eprintln!("{} {} could not be saved; changes kept in memory only", "warning:".yellow().bold(), slice);
    }
    Ok(())
}

/// `--yes` grants up front; otherwise ask on the terminal.
fn confirmer(yes: bool) -> impl Confirm {
    move |prompt: &str| {
        if yes {
            return Confirmation::Granted.confirm(prompt);
        }
        print!("{prompt} [s/N] ");
        if std::io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        if std::io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_lowercase().as_str(), "s" | "sim" | "y" | "yes")
    }
}

fn report_deletion(what: &str, id: &str, outcome: Deletion) {
    match outcome {
        Deletion::Removed => println!("{} {what} {} deleted.", "✓".green(), id.yellow()),
        Deletion::NotFound => println!("{what} {} not found.", id.yellow()),
        Deletion::Declined => println!("Cancelled."),
    }
}

fn cmd_signup(academy: &mut Academy, args: SignupArgs) -> anyhow::Result<()> {
    let role = args.role.map(|r| match r {
        RoleArg::Admin => UserRole::Admin,
        RoleArg::Mentor => UserRole::Mentor,
        RoleArg::Student => UserRole::Student,
    });
    let user = academy.sign_up(NewUser {
        name: args.name,
        email: args.email,
        role,
        avatar: None,
        bio: args.bio,
    })?;
    println!("{} Welcome, {}!", "✓".green().bold(), user.name.bold());
    println!("  Id: {}", user.id.cyan());
    println!("  Role: {}", user.role);
    Ok(())
}

fn cmd_whoami(academy: &Academy) {
    let Some(user) = academy.session() else {
        println!("Not signed in.");
        return;
    };
    println!("{} <{}> ({})", user.name.bold(), user.email, user.role);
    if !user.bio.is_empty() {
        println!("  {}", user.bio.dimmed());
    }
    print_progress(academy, user);
}

fn print_progress(academy: &Academy, user: &User) {
    for lesson in academy.lessons() {
        let test = user
            .test_result(&lesson.id)
            .map(|t| format!("{}/100", t.score).green())
            .unwrap_or_else(|| "-".dimmed());
        let practice = user
            .practice_result(&lesson.id)
            .map(|p| format!("{:.1}", p.average_score).green())
            .unwrap_or_else(|| "-".dimmed());
        let article = if user.has_read_article(&lesson.id) {
            "✓".green()
        } else {
            "-".dimmed()
        };
        println!(
            "  {:<32} test {:>7}  practice {:>5}  article {}",
            lesson.title, test, practice, article
        );
    }
}

fn cmd_feed(academy: &mut Academy, args: FeedArgs) {
    if let Some(query) = args.search {
        academy.set_search_query(query);
    }
    let me = academy.session().map(|u| u.id.clone());
    let posts = academy.visible_posts();
    if posts.is_empty() {
        println!("No posts.");
        return;
    }
    for post in posts {
        let heart = match &me {
            Some(id) if post.is_liked_by(id) => "♥".red(),
            _ => "♡".normal(),
        };
        println!(
            "{}  {} · {}",
            post.id.yellow(),
            post.user_name.bold(),
            post.content_type.to_string().dimmed()
        );
        if let Some(title) = &post.title {
            println!("  {}", title.bold());
        }
        if !post.description.is_empty() {
            println!("  {}", post.description);
        }
        for item in post.content.items() {
            println!("  {}", item.dimmed());
        }
        if let Some(url) = &post.source_url {
            println!("  {}", url.blue());
        }
        println!(
            "  {} {}  💬 {}  👁 {}",
            heart,
            post.likes.len(),
            post.comments.len(),
            post.views
        );
        for comment in &post.comments {
            println!("    {}: {}", comment.user_name.cyan(), comment.text);
        }
    }
}

fn cmd_post(academy: &mut Academy, args: PostArgs) -> anyhow::Result<()> {
    let content_type = match args.kind {
        PostKind::Article => ContentType::Article,
        PostKind::Image => ContentType::Image,
        PostKind::Video => ContentType::Video,
        PostKind::Audio => ContentType::Audio,
    };
    let mut content = args.content;
    let content = if content.len() == 1 {
        PostContent::Single(content.remove(0))
    } else {
        PostContent::Many(content)
    };
    let draft = PostDraft {
        content_type,
        content,
        title: Some(args.title),
        description: args.description,
        source_url: args.source_url,
    };
    let post = academy.publish_post(draft)?;
    println!("{} Published {}", "✓".green().bold(), post.id.yellow());
    Ok(())
}

fn cmd_lessons(academy: &Academy) {
    if academy.lessons().is_empty() {
        println!("The library is empty.");
        return;
    }
    for lesson in academy.lessons() {
        println!("{}  {}", lesson.id.yellow(), lesson.title.bold());
        println!(
            "  {} questions, {} exercises, {} sources",
            lesson.tests.len(),
            lesson.exercises.len(),
            lesson.sources.len()
        );
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn cmd_lesson_put(academy: &mut Academy, file: &Path) -> anyhow::Result<()> {
    let lesson: Lesson = read_json(file)?;
    let id = lesson.id.clone();
    let verb = match academy.upsert_lesson(lesson)? {
        Upsert::Inserted => "Added",
        Upsert::Replaced => "Updated",
    };
    println!("{} {verb} lesson {}", "✓".green().bold(), id.yellow());
    Ok(())
}

fn cmd_complete_test(academy: &mut Academy, args: CompleteTestArgs) -> anyhow::Result<()> {
    let responses: BTreeMap<u32, u32> = args
        .answers
        .iter()
        .enumerate()
        .map(|(i, choice)| (i as u32, *choice))
        .collect();
    let score = match args.score {
        Some(score) => {
            academy.record_test_completion(&args.lesson_id, score, responses)?;
            score
        }
        None => academy.submit_test(&args.lesson_id, responses)?,
    };
    println!("{} Score: {}", "🏆".yellow(), format!("{score}/100").bold());
    if let Some(post) = academy.posts().first() {
        println!("  Shared on the feed as {}", post.id.yellow());
    }
    Ok(())
}

fn cmd_complete_practice(academy: &mut Academy, args: CompletePracticeArgs) -> anyhow::Result<()> {
    let exercises: Vec<ExerciseResult> = read_json(&args.file)?;
    if exercises.is_empty() {
        bail!("{} has no exercise results", args.file.display());
    }
    let average = exercises.iter().map(|e| e.score).sum::<f64>() / exercises.len() as f64;
    academy.record_practice_completion(&args.lesson_id, average, exercises)?;
    println!("{} Practice recorded, average {:.1}", "✓".green(), average);
    Ok(())
}

fn guess_mime(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        "m4a" => "audio/mp4",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

async fn cmd_media_add(academy: &mut Academy, args: MediaAddArgs) -> anyhow::Result<()> {
    let Some(owner) = academy.session().map(|u| u.id.clone()) else {
        bail!("sign in before adding media");
    };
    let bytes = tokio::fs::read(&args.file)
        .await
        .with_context(|| format!("reading {}", args.file.display()))?;
    let mime = args
        .mime
        .unwrap_or_else(|| guess_mime(&args.file).to_string());
    let name = match args.name {
        Some(name) => name,
        None => args
            .file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "arquivo".into()),
    };

    let url = format!("data:{mime};base64,{}", STANDARD.encode(&bytes));
    let record = MediaRecord::new(MediaAsset::new(owner, name, mime), url);
    let asset = academy.add_media_asset(record).await?;
    println!(
        "{} Stored {} ({:?}, {} bytes) as {}",
        "✓".green().bold(),
        asset.name.bold(),
        asset.kind,
        bytes.len(),
        asset.id.yellow()
    );
    Ok(())
}

async fn cmd_media_ls(academy: &Academy, args: MediaLsArgs) -> anyhow::Result<()> {
    if academy.media().is_empty() {
        println!("No media.");
    }
    for asset in academy.media() {
        println!(
            "{}  {:<7} {}  {}",
            asset.id.yellow(),
            format!("{:?}", asset.kind).to_lowercase(),
            asset.name.bold(),
            asset.mime_type.dimmed()
        );
    }
    if args.orphans {
        let report = academy.orphaned_blobs().await?;
        if report.is_clean() {
            println!("{} Metadata and payloads agree.", "✓".green());
        }
        for id in &report.blobs_without_metadata {
            println!("{} payload {} has no metadata", "orphan:".yellow(), id);
        }
        for id in &report.metadata_without_blob {
            println!("{} {} has no stored payload", "missing:".red(), id);
        }
    }
    Ok(())
}
