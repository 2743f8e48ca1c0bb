use crate::cli::ServeArgs;
use crate::infra::{
    AppState, InMemoryFormNotifier, InMemoryOrderStore, InMemoryPageStore, InMemorySnippetStore,
    InMemorySubmissionStore,
};
use crate::routes::{process_router, with_operational_routes, SiteContent};
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

use ovenbird::admin::board::render::escape_html;
use ovenbird::admin::board::BoardAdmin;
use ovenbird::admin::{AdminRegistry, AdminSite, HomePanel, MenuItem};
use ovenbird::config::AppConfig;
use ovenbird::content::forms::router::form_router;
use ovenbird::content::forms::FormSubmissionService;
use ovenbird::content::pages::{page_admin_router, page_router, PageRoutes, PageService};
use ovenbird::content::snippets::Person;
use ovenbird::error::AppError;
use ovenbird::site::{
    onboarding_process, orders_board_config, standard_contact_form, standard_people,
};
use ovenbird::telemetry;

const JKANBAN_JS: &str = "https://cdnjs.cloudflare.com/ajax/libs/jkanban/1.3.1/jkanban.min.js";
const JKANBAN_CSS: &str = "https://cdnjs.cloudflare.com/ajax/libs/jkanban/1.3.1/jkanban.min.css";

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let orders = Arc::new(InMemoryOrderStore::seeded());
    let pages = Arc::new(InMemoryPageStore::seeded());
    let snippets = Arc::new(InMemorySnippetStore::seeded());
    let submissions = Arc::new(InMemorySubmissionStore::default());
    let notifier = Arc::new(InMemoryFormNotifier::default());

    let page_service = Arc::new(PageService::new(pages));
    let form_service = Arc::new(FormSubmissionService::new(
        vec![standard_contact_form()],
        submissions,
        notifier,
    ));

    let board = Arc::new(
        BoardAdmin::new(
            "/admin/api/boards/orders",
            orders_board_config(),
            orders.clone(),
        )
        .with_writer(orders),
    );
    board.validate()?;

    let content = Arc::new(SiteContent {
        processes: vec![onboarding_process()],
    });
    for process in &content.processes {
        for violation in process.validate() {
            warn!(
                process = %process.slug,
                block = %violation.block,
                "seed content violation: {}",
                violation.message
            );
        }
    }

    let admin = admin_site(board, page_service.clone())?;

    let app = admin
        .router
        .merge(form_router(form_service))
        .merge(page_router(PageRoutes {
            pages: page_service,
            snippets,
        }))
        .merge(process_router(content));
    let app = with_operational_routes(app)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "bakery content service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Populates the admin registry: menus, dashboard panels, board assets, and
/// the admin feature routers.
fn admin_site(
    board: Arc<BoardAdmin<InMemoryOrderStore, InMemoryOrderStore>>,
    page_service: Arc<PageService<InMemoryPageStore>>,
) -> Result<AdminSite, AppError> {
    let mut registry = AdminRegistry::new();

    registry.register_menu_item(
        MenuItem::new("orders-board", "Orders board", board.path())
            .with_icon("table")
            .with_order(100),
    );
    registry.register_menu_item(
        MenuItem::new("editor-guide", "Editor guide", "https://guide.oldegreentree.example")
            .with_icon("help")
            .with_order(900)
            .with_attr("target", "_blank")
            .with_attr("rel", "noopener"),
    );

    registry.register_script(JKANBAN_JS);
    registry.register_stylesheet(JKANBAN_CSS);

    registry.register_panel(HomePanel::new(
        50,
        "<p>Welcome back. Fresh orders land on the board below.</p>",
    ));
    registry.register_panel(HomePanel::new(100, team_panel(&standard_people())));

    let board_path = board.path().to_string();
    registry.register_routes(board_path, board.router());
    registry.register_routes("/admin/api/pages", page_admin_router(page_service));

    Ok(registry.build()?)
}

fn team_panel(people: &[Person]) -> String {
    let mut html = String::from("<h3>Meet the bakers</h3><ul>");
    for person in people {
        html.push_str(&format!(
            "<li>{} ({})</li>",
            escape_html(&person.full_name()),
            escape_html(&person.job_title)
        ));
    }
    html.push_str("</ul>");
    html
}
