use anyhow::Result;
use clap::{Parser, Subcommand};
use ldpfs::api::{init_logging, LdpFs, RequestContext, RequestContextBuilder};
use ldpfs::config::Config;
use ldpfs::store::ByteRange;
use log::info;
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "ldpfs")]
#[command(about = "Filesystem-backed LDP resource tree inspector")]
#[command(arg_required_else_help = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Verbose mode - sets the RUST_LOG level to info, defaults to warning level
    #[clap(long, short, action, default_value = "false", global = true)]
    verbose: bool,
    /// Debug mode - sets the RUST_LOG level to debug, defaults to warning level
    #[clap(long, action, default_value = "false", global = true)]
    debug: bool,
    /// Root of the resource tree
    #[clap(long, short, default_value = ".", global = true)]
    root: PathBuf,
    /// Virtual host the request is issued against
    #[clap(long, default_value = "localhost", global = true)]
    host: String,
    /// Partition the tree per virtual host (root/<host>/...)
    #[clap(long, action, global = true)]
    multi_tenant: bool,
    /// Base URI used to anchor container graphs, defaults to https://<host>
    #[clap(long, global = true)]
    base_uri: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch a resource; containers print their turtle description
    Get {
        /// Request path of the resource, e.g. /notes/todo.ttl
        path: String,
        /// Only print stat-derived attributes, never the body
        #[clap(long, action)]
        head: bool,
        /// Byte range to fetch, as start-end
        #[clap(long)]
        range: Option<String>,
    },
    /// Write a resource from a local file (or stdin with '-')
    Put {
        /// Request path of the resource
        path: String,
        /// Local file holding the new content
        file: String,
    },
    /// Create a resource inside a container
    Post {
        /// Request path of the target container
        path: String,
        /// Desired name for the new resource; generated when omitted
        #[clap(long, short)]
        slug: Option<String>,
        /// Create a container instead of a plain resource
        #[clap(long, action)]
        container: bool,
        /// Local file holding the initial content (metadata turtle for containers)
        file: Option<String>,
    },
    /// Delete a resource
    Delete {
        /// Request path of the resource
        path: String,
    },
    /// Check whether a resource exists
    Exists {
        /// Request path of the resource
        path: String,
    },
    /// Parse an RDF resource and print its triple count
    Graph {
        /// Request path of the resource
        path: String,
        /// Media type to parse as, defaults to text/turtle
        #[clap(long, short)]
        content_type: Option<String>,
    },
    /// Prints the version of the ldpfs binary
    Version,
}

fn parse_range(spec: &str) -> Result<ByteRange> {
    let (start, end) = spec
        .split_once('-')
        .ok_or_else(|| anyhow::anyhow!("range must be start-end, got {:?}", spec))?;
    Ok(ByteRange {
        start: start.parse()?,
        end: end.parse()?,
    })
}

fn read_content(file: Option<&str>) -> Result<Vec<u8>> {
    match file {
        None => Ok(Vec::new()),
        Some("-") => {
            let mut buf = Vec::new();
            std::io::Read::read_to_end(&mut std::io::stdin(), &mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read(path)?),
    }
}

fn context(cli: &Cli, path: &str) -> Result<RequestContext> {
    let mut builder = RequestContextBuilder::default();
    builder.hostname(cli.host.clone()).path(path);
    if let Some(base) = &cli.base_uri {
        builder.base_uri(base.clone());
    }
    builder
        .build()
        .map_err(|e| anyhow::anyhow!("bad request context: {}", e))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging();
    if cli.verbose {
        std::env::set_var("RUST_LOG", "info");
    }
    if cli.debug {
        std::env::set_var("RUST_LOG", "debug");
    }
    env_logger::init();

    let mut config = Config::new(cli.root.clone());
    config.multi_tenant = cli.multi_tenant;
    let ldp = LdpFs::new(config);

    match &cli.command {
        Commands::Get { path, head, range } => {
            let mut ctx = context(&cli, path)?;
            ctx.include_body = !head;
            if let Some(spec) = range {
                ctx.range = Some(parse_range(spec)?);
            }
            let response = ldp.get(&ctx)?;
            if *head {
                println!("content-type: {}", response.content_type);
                println!("container: {}", response.is_container);
                println!("size: {}", response.size);
                if let Some(modified) = response.modified {
                    println!("modified: {}", modified.to_rfc3339());
                }
            } else {
                if let Some(content_range) = response.content_range {
                    info!("content-range: {}", content_range);
                }
                let bytes = response.body_bytes()?;
                std::io::stdout().write_all(&bytes)?;
            }
        }
        Commands::Put { path, file } => {
            let content = read_content(Some(file))?;
            let ctx = context(&cli, path)?;
            ldp.put(&ctx, std::io::Cursor::new(content))?;
            println!("Wrote {}", path);
        }
        Commands::Post {
            path,
            slug,
            container,
            file,
        } => {
            let content = read_content(file.as_deref())?;
            let ctx = context(&cli, path)?;
            let created = ldp.post(
                &ctx,
                slug.as_deref(),
                std::io::Cursor::new(content),
                *container,
            )?;
            println!("Created {}", created.display());
        }
        Commands::Delete { path } => {
            let ctx = context(&cli, path)?;
            ldp.delete(&ctx)?;
            println!("Deleted {}", path);
        }
        Commands::Exists { path } => {
            let ctx = context(&cli, path)?;
            println!("{}", ldp.exists(&ctx));
        }
        Commands::Graph { path, content_type } => {
            let mut ctx = context(&cli, path)?;
            ctx.content_type = content_type.clone();
            let graph = ldp.graph(&ctx)?;
            println!("{} triples", graph.len());
        }
        Commands::Version => {
            println!("ldpfs {}", env!("CARGO_PKG_VERSION"));
        }
    }
    Ok(())
}
