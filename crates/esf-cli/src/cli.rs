use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "esf",
    about = "ESF Finanças: Escola de Sabedoria financial learning",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Directory holding the structured store and the media database
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long, global = true, default_value = "esf.toml")]
    pub config: PathBuf,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum RoleArg {
    Admin,
    Mentor,
    Student,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum PostKind {
    Article,
    Image,
    Video,
    Audio,
}

#[derive(Subcommand)]
pub enum Command {
    /// Register a new user and sign in
    Signup(SignupArgs),
    /// Sign in with a registered email
    Login(LoginArgs),
    /// Sign out
    Logout,
    /// Show the signed-in user and their progress
    Whoami,
    /// List feed posts, newest first
    Feed(FeedArgs),
    /// Publish a post
    Post(PostArgs),
    /// Like or unlike a post
    Like(PostRef),
    /// Comment on a post (moderated)
    Comment(CommentArgs),
    /// List the lesson library
    Lessons,
    /// Create or replace a lesson from a JSON file (admin only)
    LessonPut(LessonPutArgs),
    /// Delete a lesson (admin only)
    LessonRm(RemoveArgs),
    /// Record a finished quiz
    CompleteTest(CompleteTestArgs),
    /// Record graded practice exercises from a JSON file
    CompletePractice(CompletePracticeArgs),
    /// Mark a lesson's article as read
    CompleteArticle(LessonRef),
    /// Add a file to the media library
    MediaAdd(MediaAddArgs),
    /// Delete a media asset
    MediaRm(RemoveArgs),
    /// List media assets
    MediaLs(MediaLsArgs),
    /// Toggle dark mode
    Theme,
    /// Show the tip of the day
    Tip,
}

#[derive(Args)]
pub struct SignupArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long, value_enum)]
    pub role: Option<RoleArg>,
    #[arg(long)]
    pub bio: Option<String>,
}

#[derive(Args)]
pub struct LoginArgs {
    pub email: String,
}

#[derive(Args)]
pub struct FeedArgs {
    /// Filter by description or author name
    #[arg(short, long)]
    pub search: Option<String>,
}

#[derive(Args)]
pub struct PostArgs {
    pub title: String,
    /// Post body; repeat for multi-item posts (e.g. several image URLs)
    #[arg(required = true)]
    pub content: Vec<String>,
    #[arg(long, value_enum, default_value = "article")]
    pub kind: PostKind,
    #[arg(short, long, default_value = "")]
    pub description: String,
    #[arg(long)]
    pub source_url: Option<String>,
}

#[derive(Args)]
pub struct PostRef {
    pub post_id: String,
}

#[derive(Args)]
pub struct CommentArgs {
    pub post_id: String,
    pub text: String,
}

#[derive(Args)]
pub struct LessonRef {
    pub lesson_id: String,
}

#[derive(Args)]
pub struct LessonPutArgs {
    /// Path to a lesson JSON document
    pub file: PathBuf,
}

#[derive(Args)]
pub struct RemoveArgs {
    pub id: String,
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct CompleteTestArgs {
    pub lesson_id: String,
    /// Chosen option per question, in order (e.g. `2,0,3`)
    #[arg(long, value_delimiter = ',')]
    pub answers: Vec<u32>,
    /// Record this score instead of grading the answers
    #[arg(long)]
    pub score: Option<u32>,
}

#[derive(Args)]
pub struct CompletePracticeArgs {
    pub lesson_id: String,
    /// JSON array of `{answer, score, feedback}` results
    pub file: PathBuf,
}

#[derive(Args)]
pub struct MediaAddArgs {
    pub file: PathBuf,
    /// Display name; defaults to the file name
    #[arg(long)]
    pub name: Option<String>,
    /// Mime type; guessed from the extension when omitted
    #[arg(long)]
    pub mime: Option<String>,
}

#[derive(Args)]
pub struct MediaLsArgs {
    /// Also compare metadata against stored payloads
    #[arg(long)]
    pub orphans: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_login() {
        let cli = Cli::try_parse_from(["esf", "login", "aluno@esf.com"]).unwrap();
        if let Command::Login(args) = cli.command {
            assert_eq!(args.email, "aluno@esf.com");
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_signup_with_role() {
        let cli = Cli::try_parse_from([
            "esf", "signup", "--name", "Maria", "--email", "m@esf.com", "--role", "mentor",
        ])
        .unwrap();
        if let Command::Signup(args) = cli.command {
            assert_eq!(args.name, "Maria");
            assert!(matches!(args.role, Some(RoleArg::Mentor)));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_global_flags_after_command() {
        let cli = Cli::try_parse_from(["esf", "whoami", "--data-dir", "/tmp/esf", "-v"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/esf")));
        assert_eq!(cli.config, PathBuf::from("esf.toml"));
    }

    #[test]
    fn parse_feed_search() {
        let cli = Cli::try_parse_from(["esf", "feed", "-s", "mesada"]).unwrap();
        if let Command::Feed(args) = cli.command {
            assert_eq!(args.search, Some("mesada".into()));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_multi_item_post() {
        let cli = Cli::try_parse_from([
            "esf", "post", "Galeria", "https://a/1.png", "https://a/2.png", "--kind", "image",
        ])
        .unwrap();
        if let Command::Post(args) = cli.command {
            assert_eq!(args.content.len(), 2);
            assert!(matches!(args.kind, PostKind::Image));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn post_needs_content() {
        assert!(Cli::try_parse_from(["esf", "post", "Sem corpo"]).is_err());
    }

    #[test]
    fn parse_complete_test_answers() {
        let cli = Cli::try_parse_from(["esf", "complete-test", "lesson-2", "--answers", "2,2,0"]).unwrap();
        if let Command::CompleteTest(args) = cli.command {
            assert_eq!(args.lesson_id, "lesson-2");
            assert_eq!(args.answers, vec![2, 2, 0]);
            assert!(args.score.is_none());
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_lesson_rm_yes() {
        let cli = Cli::try_parse_from(["esf", "lesson-rm", "lesson-1", "--yes"]).unwrap();
        if let Command::LessonRm(args) = cli.command {
            assert!(args.yes);
            assert_eq!(args.id, "lesson-1");
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_media_ls_orphans() {
        let cli = Cli::try_parse_from(["esf", "media-ls", "--orphans"]).unwrap();
        assert!(matches!(cli.command, Command::MediaLs(MediaLsArgs { orphans: true })));
    }

    #[test]
    fn parse_theme() {
        let cli = Cli::try_parse_from(["esf", "theme"]).unwrap();
        assert!(matches!(cli.command, Command::Theme));
    }
}
