use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use planbook::api::{CurriculumApi, InMemoryApi, SpecialDay};
use planbook::config::Config;
use planbook::error::{AppError, AppResult, run_with_error_handler};
use planbook::model::entity::{
    AnyEntity, CourseCreate, CourseSnapshot, EntityDraft, LessonCreate, SubTopicCreate, TopicCreate,
};
use planbook::model::{CurriculumEntity, EntityKind, NodeKey};
use planbook::planner::{DropOutcome, PlannerService, ToastQueue};
use planbook::tree::{DropPosition, DropRequest, TreeNode, TreeOptions, build_tree};

#[derive(Parser, Debug)]
#[command(about = "Browse and rearrange lesson plans", long_about = None)]
pub struct Cli {
    /// Work offline against a JSON file holding a list of course snapshots
    #[arg(long, global = true)]
    pub fixture: Option<PathBuf>,

    /// Read ./config.toml instead of the user config directory
    #[arg(long, global = true, default_value_t = false)]
    pub local_config: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List courses
    Courses,

    /// Print the curriculum tree
    Tree {
        #[arg(long)]
        course: Option<i64>,
        /// Include archived entities
        #[arg(long, default_value_t = false)]
        archived: bool,
    },

    /// Move a node, as if it was dragged in the tree
    Move {
        kind: EntityKind,
        id: i64,
        #[command(flatten)]
        target: MoveTarget,
        /// Print the predicted tree without contacting the backend
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },

    /// Copy a node and everything below it to the end of a container
    Copy {
        kind: EntityKind,
        id: i64,
        /// Target container, e.g. `topic:4`
        #[arg(long)]
        into: NodeKey,
    },

    /// Show the sort order a new child of a container would get
    NextOrder { container: NodeKey },

    /// Add a course, or an entity under a container
    Add {
        kind: EntityKind,
        #[arg(long)]
        title: String,
        #[arg(long)]
        parent: Option<NodeKey>,
    },

    /// Change the title of a node
    Rename {
        node: NodeKey,
        #[arg(long)]
        title: String,
    },

    /// Delete a node and everything below it
    Delete { node: NodeKey },

    /// Manage schedule overrides of a course
    SpecialDays {
        #[command(subcommand)]
        action: SpecialDayCommands,
    },
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct MoveTarget {
    /// Drop inside this container
    #[arg(long)]
    into: Option<NodeKey>,
    /// Drop before this sibling
    #[arg(long)]
    before: Option<NodeKey>,
    /// Drop after this sibling
    #[arg(long)]
    after: Option<NodeKey>,
}

impl MoveTarget {
    fn resolve(&self) -> Option<(NodeKey, DropPosition)> {
        match (self.into, self.before, self.after) {
            (Some(key), _, _) => Some((key, DropPosition::Inside)),
            (_, Some(key), _) => Some((key, DropPosition::Before)),
            (_, _, Some(key)) => Some((key, DropPosition::After)),
            _ => None,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum SpecialDayCommands {
    List {
        #[arg(long)]
        course: i64,
    },
    Set {
        #[arg(long)]
        course: i64,
        /// Date as YYYY-MM-DD
        #[arg(long)]
        date: NaiveDate,
        #[arg(long)]
        label: String,
        #[arg(long, default_value_t = false)]
        cancels_lessons: bool,
    },
}

fn print_trees(nodes: &[TreeNode]) {
    for node in nodes {
        println!("{}", node.to_termtree());
    }
}

fn print_toasts(toasts: &ToastQueue) {
    for toast in toasts.drain() {
        println!("{toast}");
    }
}

fn load_fixture(path: &PathBuf) -> AppResult<InMemoryApi> {
    let text = std::fs::read_to_string(path)?;
    let snapshots: Vec<CourseSnapshot> = serde_json::from_str(&text)
        .map_err(|e| AppError::InputError(format!("{}: {e}", path.display())))?;
    Ok(InMemoryApi::from_snapshots(snapshots))
}

fn draft_for(
    service: &PlannerService<impl CurriculumApi>,
    kind: EntityKind,
    title: String,
    parent: Option<NodeKey>,
) -> AppResult<EntityDraft> {
    let parent = match (kind, parent) {
        (EntityKind::Course, _) => return Ok(EntityDraft::Course(CourseCreate::new(title))),
        (_, Some(parent)) => service
            .cache()
            .get(parent)
            .ok_or_else(|| AppError::InputError(format!("{parent} is not loaded")))?,
        (_, None) => return Err(AppError::InputError(format!("a {kind} needs --parent"))),
    };

    let draft = match (kind, parent) {
        (EntityKind::Topic, AnyEntity::Course(_)) => {
            EntityDraft::Topic(TopicCreate::new(parent.id(), title))
        }
        (EntityKind::SubTopic, AnyEntity::Topic(t)) => {
            EntityDraft::SubTopic(SubTopicCreate::new(t.course_id(), parent.id(), title))
        }
        (EntityKind::Lesson, AnyEntity::Topic(t)) => {
            EntityDraft::Lesson(LessonCreate::in_topic(t.course_id(), parent.id(), title))
        }
        (EntityKind::Lesson, AnyEntity::SubTopic(s)) => EntityDraft::Lesson(
            LessonCreate::in_sub_topic(s.course_id(), s.topic_id(), parent.id(), title),
        ),
        _ => {
            return Err(AppError::InputError(format!(
                "a {} cannot contain a {kind}",
                parent.kind()
            )));
        }
    };
    Ok(draft)
}

fn renamed(entity: &AnyEntity, title: String) -> AnyEntity {
    match entity.clone() {
        AnyEntity::Course(mut e) => {
            e.set_title(title);
            e.into()
        }
        AnyEntity::Topic(mut e) => {
            e.set_title(title);
            e.into()
        }
        AnyEntity::SubTopic(mut e) => {
            e.set_title(title);
            e.into()
        }
        AnyEntity::Lesson(mut e) => {
            e.set_title(title);
            e.into()
        }
    }
}

async fn load_all<A: CurriculumApi>(service: &mut PlannerService<A>) -> AppResult<()> {
    let courses = service.load_courses().await?;
    for course in courses {
        service.load_course(course.id()).await?;
    }
    Ok(())
}

async fn execute<A: CurriculumApi>(
    service: &mut PlannerService<A>,
    toasts: &ToastQueue,
    command: &Commands,
) -> AppResult<()> {
    load_all(service).await?;

    match command {
        Commands::Courses => {
            for course in service.cache().courses() {
                println!("{} [{}] {}", course.key(), course.sort_order(), course.title());
            }
        }

        Commands::Tree { course, archived } => {
            let options = TreeOptions {
                show_archived: *archived || service.config().show_archived(),
                course: *course,
            };
            print_trees(&service.tree_with(&options));
        }

        Commands::Move {
            kind,
            id,
            target,
            dry_run,
        } => {
            let (target, position) = target
                .resolve()
                .ok_or_else(|| AppError::InputError(String::from("no drop target given")))?;
            let source = NodeKey::new(*kind, *id);
            let request = DropRequest::new(source, target, position);

            if *dry_run {
                let preview = service.preview_drop(&request).map_err(planbook::planner::PlannerError::from)?;
                let course = preview.get(source).map(AnyEntity::course_id);
                print_trees(&build_tree(
                    &preview,
                    &TreeOptions {
                        show_archived: service.config().show_archived(),
                        course,
                    },
                ));
                return Ok(());
            }

            match service.drop_node(request).await? {
                DropOutcome::Moved { plan, entity } => {
                    println!(
                        "{:?}: {} is now under {} at {}",
                        plan.kind,
                        entity.key(),
                        plan.target_parent,
                        entity.sort_order()
                    );
                }
                DropOutcome::Rejected(rejection) => println!("not moved: {rejection}"),
            }
        }

        Commands::Copy { kind, id, into } => {
            let copy = service.copy_node(NodeKey::new(*kind, *id), *into).await?;
            println!("created {} at {}", copy.key(), copy.sort_order());
        }

        Commands::NextOrder { container } => {
            println!("{}", service.next_sort_order(*container)?);
        }

        Commands::Add {
            kind,
            title,
            parent,
        } => {
            let draft = draft_for(service, *kind, title.clone(), *parent)?;
            let created = service.create(draft).await?;
            println!("created {} at {}", created.key(), created.sort_order());
        }

        Commands::Rename { node, title } => {
            let entity = service
                .cache()
                .get(*node)
                .ok_or_else(|| AppError::InputError(format!("{node} is not loaded")))?;
            let entity = renamed(entity, title.clone());
            service.update(entity).await?;
        }

        Commands::Delete { node } => service.delete(*node).await?,

        Commands::SpecialDays { action } => match action {
            SpecialDayCommands::List { course } => {
                for day in service.special_days(*course).await? {
                    let cancels = if day.cancels_lessons { " (no lessons)" } else { "" };
                    println!("{} {}{}", day.date, day.label, cancels);
                }
            }
            SpecialDayCommands::Set {
                course,
                date,
                label,
                cancels_lessons,
            } => {
                service
                    .save_special_day(SpecialDay {
                        id: None,
                        course_id: *course,
                        date: *date,
                        label: label.clone(),
                        cancels_lessons: *cancels_lessons,
                    })
                    .await?;
            }
        },
    }

    print_toasts(toasts);
    Ok(())
}

#[tokio::main]
async fn main() {
    planbook::setup_trace();
    let args = Cli::parse();
    tracing::debug!("running {:?}", args.command);

    run_with_error_handler(async || {
        let toasts = ToastQueue::new();
        let notifier = Arc::new(toasts.clone());

        let result = match &args.fixture {
            Some(path) => {
                let api = load_fixture(path)?;
                let config = match Config::load(args.local_config) {
                    Ok(config) => config.planner().clone(),
                    Err(_) => Default::default(),
                };
                let mut service = PlannerService::new(api, config, notifier);
                execute(&mut service, &toasts, &args.command).await
            }
            None => {
                let config = Config::get_or_init(args.local_config).await;
                let mut service = planbook::connect(config, notifier)?;
                execute(&mut service, &toasts, &args.command).await
            }
        };

        // error toasts are raised before the error propagates
        print_toasts(&toasts);
        result
    })
    .await;
}
