use clap::{Parser, Subcommand};
use flatgal::album::{self, Album};
use flatgal::config::{self, BuildConfig};
use flatgal::filter::parse_tag_list;
use flatgal::gallery::{self, Gallery};
use flatgal::imaging::RustBackend;
use flatgal::resize::ResizeEvent;
use flatgal::{merge, output};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::mpsc::Sender;

#[derive(Parser)]
#[command(name = "flatgal")]
#[command(about = "Static photo gallery builder")]
#[command(long_about = "\
Static photo gallery builder

An album file lists images, one block per image, blocks separated by blank
lines: the filename, an optional description line, and any number of
`Tag: a, b` lines.

  IMG_0001.jpg
  A dog on the beach
  Tag: dogs, beach

  IMG_0002.jpg
  Tag: beach

Each chosen image gets a square thumbnail and a display-size variant. Album
pages (index.html, page-2.html, ...) show thumbnails; image pages
(image-0.html, ...) show one image each with prev/next links.

A gallery file lists several albums as `key = value` blocks (album-name,
album-dir, album-subdir, album-file, album-tags) and gets a top-level index.

Existing outputs are reused unless forced. Run 'flatgal gen-config' to
generate a documented config file.")]
#[command(version)]
struct Cli {
    /// Config file (TOML). Command-line flags override its values.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug detail (cache hits, page writes)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

/// Flags shared by the commands that build.
#[derive(clap::Args, Clone, Default)]
struct BuildArgs {
    /// Thumbnail edge in pixels (or percent with --percent)
    #[arg(long)]
    thumbnail_size: Option<u32>,
    /// Display image longest edge in pixels (or percent with --percent)
    #[arg(long)]
    large_size: Option<u32>,
    /// Read sizes as a percentage of each source image
    #[arg(long)]
    percent: bool,
    /// JPEG quality (1-100)
    #[arg(long)]
    quality: Option<u32>,
    /// Thumbnails per album page
    #[arg(long)]
    page_size: Option<u32>,
    /// Parallel resize workers
    #[arg(long)]
    workers: Option<u32>,
    /// Do not copy originals into the install directory
    #[arg(long)]
    no_originals: bool,
    /// Write a zip archive of each album's chosen originals
    #[arg(long)]
    archive: bool,
    /// Regenerate everything: variants, pages and archives
    #[arg(long)]
    force: bool,
    /// Regenerate image variants even if they exist
    #[arg(long)]
    force_images: bool,
    /// Rewrite HTML pages even if they exist
    #[arg(long)]
    force_html: bool,
    /// Rewrite archives even if they exist
    #[arg(long)]
    force_archive: bool,
}

impl BuildArgs {
    /// Only the flags actually given, as a sparse TOML table.
    fn overlay(&self) -> toml::Value {
        let mut images = toml::Table::new();
        let set = |table: &mut toml::Table, key: &str, value: Option<u32>| {
            if let Some(v) = value {
                table.insert(key.to_string(), toml::Value::Integer(i64::from(v)));
            }
        };
        set(&mut images, "thumbnail_size", self.thumbnail_size);
        set(&mut images, "large_size", self.large_size);
        set(&mut images, "quality", self.quality);
        if self.percent {
            images.insert("size_mode".into(), toml::Value::String("percent".into()));
        }

        let mut pages = toml::Table::new();
        set(&mut pages, "page_size", self.page_size);
        let mut processing = toml::Table::new();
        set(&mut processing, "workers", self.workers);

        let mut output = toml::Table::new();
        if self.no_originals {
            output.insert("include_originals".into(), toml::Value::Boolean(false));
        }
        if self.archive {
            output.insert("include_archive".into(), toml::Value::Boolean(true));
        }

        let mut force = toml::Table::new();
        for (key, on) in [
            ("images", self.force || self.force_images),
            ("html", self.force || self.force_html),
            ("archive", self.force || self.force_archive),
        ] {
            if on {
                force.insert(key.into(), toml::Value::Boolean(true));
            }
        }

        let mut root = toml::Table::new();
        for (key, table) in [
            ("images", images),
            ("pages", pages),
            ("processing", processing),
            ("output", output),
            ("force", force),
        ] {
            if !table.is_empty() {
                root.insert(key.into(), toml::Value::Table(table));
            }
        }
        toml::Value::Table(root)
    }
}

#[derive(Subcommand)]
enum Command {
    /// Build one album
    Album {
        /// Album file listing the images
        #[arg(long)]
        album_file: PathBuf,
        /// Directory holding the source images
        #[arg(long)]
        image_dir: PathBuf,
        /// Where pages and variants are written
        #[arg(long)]
        install_dir: PathBuf,
        /// Album title
        #[arg(long)]
        name: String,
        /// Only build images carrying one of these tags (comma-separated)
        #[arg(long, default_value = "")]
        tags: String,
        #[command(flatten)]
        build: BuildArgs,
    },
    /// Build every album of a gallery file plus the gallery index
    Gallery {
        /// Gallery file listing the albums
        #[arg(long)]
        gallery_file: PathBuf,
        /// Root directory; each album goes into its album-subdir
        #[arg(long)]
        install_dir: PathBuf,
        /// Gallery title
        #[arg(long, default_value = "Gallery")]
        name: String,
        #[command(flatten)]
        build: BuildArgs,
    },
    /// Parse and filter without building anything
    Check {
        /// Album file to check
        #[arg(long, conflicts_with = "gallery_file", required_unless_present = "gallery_file")]
        album_file: Option<PathBuf>,
        /// Also verify that every chosen source exists here
        #[arg(long, requires = "album_file")]
        image_dir: Option<PathBuf>,
        /// Tag filter for --album-file (comma-separated)
        #[arg(long, default_value = "")]
        tags: String,
        /// Gallery file to check, with all its albums
        #[arg(long)]
        gallery_file: Option<PathBuf>,
        /// Print the chosen records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Merge new records into an album file, ordered by filename
    Merge {
        /// Current album file
        #[arg(long)]
        existing: PathBuf,
        /// Album file with the records to add
        #[arg(long)]
        additions: PathBuf,
        /// Where to write the merged album file
        #[arg(long)]
        output: PathBuf,
    },
    /// Print a stock config file with all options documented
    GenConfig,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(err) = init_logging(cli.verbose) {
        eprintln!("error: {err}");
        return ExitCode::FAILURE;
    }
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    match cli.command {
        Command::Album {
            album_file,
            image_dir,
            install_dir,
            name,
            tags,
            build,
        } => {
            let config = load_build_config(cli.config.as_deref(), &build)?;
            let mut album = Album::new(name, album_file, image_dir, install_dir)
                .with_tags(parse_tag_list(&tags));
            let backend = RustBackend::new();
            let summary = with_progress(|tx| album.install(&config, &backend, Some(tx)))??;
            output::print_album_summary(&summary);
        }
        Command::Gallery {
            gallery_file,
            install_dir,
            name,
            build,
        } => {
            let config = load_build_config(cli.config.as_deref(), &build)?;
            let gallery = Gallery::new(name, gallery_file, install_dir);
            let backend = RustBackend::new();
            let summary = with_progress(|tx| gallery.install(&config, &backend, Some(tx)))??;
            output::print_gallery_summary(&summary);
        }
        Command::Check {
            album_file,
            image_dir,
            tags,
            gallery_file,
            json,
        } => {
            let checks = match (album_file, gallery_file) {
                (Some(album_file), _) => {
                    let name = album_file
                        .file_stem()
                        .map(|s| s.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    vec![album::check_album(
                        &name,
                        &album_file,
                        image_dir.as_deref(),
                        &parse_tag_list(&tags),
                    )?]
                }
                (None, Some(gallery_file)) => gallery::check_gallery(&gallery_file)?,
                (None, None) => return Err("check needs --album-file or --gallery-file".into()),
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&checks)?);
            } else {
                output::print_album_checks(&checks);
            }
        }
        Command::Merge {
            existing,
            additions,
            output,
        } => {
            let count = merge::merge_album_files(&existing, &additions, &output)?;
            println!("Merged {} records \u{2192} {}", count, output.display());
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) -> Result<(), Box<dyn Error>> {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn load_build_config(file: Option<&Path>, build: &BuildArgs) -> Result<BuildConfig, Box<dyn Error>> {
    Ok(config::load_config(file, Some(build.overlay()))?)
}

/// Run `work` while a printer thread shows its resize events.
fn with_progress<T>(work: impl FnOnce(&Sender<ResizeEvent>) -> T) -> Result<T, Box<dyn Error>> {
    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            for line in output::format_resize_event(&event) {
                println!("{}", line);
            }
        }
    });
    let result = work(&tx);
    drop(tx);
    printer
        .join()
        .map_err(|_| "progress printer thread panicked")?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn empty_overlay_keeps_defaults() {
        let config = config::load_config(None, Some(BuildArgs::default().overlay())).unwrap();
        assert_eq!(config, BuildConfig::default());
    }

    #[test]
    fn overlay_carries_given_flags() {
        let args = BuildArgs {
            thumbnail_size: Some(20),
            large_size: Some(80),
            percent: true,
            workers: Some(2),
            archive: true,
            no_originals: true,
            force_html: true,
            ..BuildArgs::default()
        };
        let config = config::load_config(None, Some(args.overlay())).unwrap();

        assert_eq!(config.images.thumbnail_size, 20);
        assert_eq!(config.images.large_size, 80);
        assert_eq!(config.images.size_mode, flatgal::imaging::SizeMode::Percent);
        assert_eq!(config.processing.workers, 2);
        assert!(config.output.include_archive);
        assert!(!config.output.include_originals);
        assert!(config.force.html);
        assert!(!config.force.images);
    }

    #[test]
    fn force_sets_every_switch() {
        let args = BuildArgs {
            force: true,
            ..BuildArgs::default()
        };
        let config = config::load_config(None, Some(args.overlay())).unwrap();
        assert_eq!(config.force, config::ForceConfig::all());
    }

    #[test]
    fn parses_album_command() {
        let cli = Cli::try_parse_from([
            "flatgal",
            "--verbose",
            "album",
            "--album-file",
            "a.txt",
            "--image-dir",
            "img",
            "--install-dir",
            "out",
            "--name",
            "Summer",
            "--tags",
            "x, y",
            "--page-size",
            "10",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Command::Album { name, tags, build, .. } => {
                assert_eq!(name, "Summer");
                assert_eq!(parse_tag_list(&tags), vec!["x", "y"]);
                assert_eq!(build.page_size, Some(10));
            }
            _ => panic!("expected album command"),
        }
    }

    #[test]
    fn check_rejects_both_inputs() {
        let result = Cli::try_parse_from([
            "flatgal",
            "check",
            "--album-file",
            "a.txt",
            "--gallery-file",
            "g.txt",
        ]);
        assert!(result.is_err());
    }
}
