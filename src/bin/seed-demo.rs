//! Seed the database with demo portfolio content and blog posts.
//! Idempotent per slug: existing rows are left alone.
//!
//! Usage: DATABASE_URL=postgresql://... cargo run --bin seed-demo

use sqlx::PgPool;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let pool = portfolio_cms_backend::db::init_pool(None)
        .await
        .expect("failed to connect to database");
    portfolio_cms_backend::db::run_migrations(&pool)
        .await
        .expect("failed to run migrations");

    seed(&pool).await.expect("seeding failed");
    tracing::info!("Demo data seeded");
}

async fn project_id_for_slug(pool: &PgPool, slug: &str) -> Result<Option<i64>, sqlx::Error> {
    let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM projects WHERE slug = $1")
        .bind(slug)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|(id,)| id))
}

async fn insert_project(
    pool: &PgPool,
    slug: &str,
    title: &str,
    short_description: &str,
    industry: &str,
) -> Result<Option<i64>, sqlx::Error> {
    if project_id_for_slug(pool, slug).await?.is_some() {
        tracing::info!(slug = slug, "project already present, skipping");
        return Ok(None);
    }
    let (id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO projects (title, slug, short_description, industry)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(title)
    .bind(slug)
    .bind(short_description)
    .bind(industry)
    .fetch_one(pool)
    .await?;
    Ok(Some(id))
}

async fn insert_section(
    pool: &PgPool,
    project_id: i64,
    order: i32,
    section_type: &str,
    title: Option<&str>,
    content: &str,
) -> Result<i64, sqlx::Error> {
    let (id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO project_sections (project_id, "order", type, title, content)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        "#,
    )
    .bind(project_id)
    .bind(order)
    .bind(section_type)
    .bind(title)
    .bind(content)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

async fn seed(pool: &PgPool) -> Result<(), sqlx::Error> {
    if let Some(wofa) = insert_project(
        pool,
        "wofa",
        "WOFA",
        "A hyperlocal workspace discovery and booking platform for India's startup generation.",
        "Workspace, Marketplace",
    )
    .await?
    {
        insert_section(
            pool,
            wofa,
            1,
            "paragraph",
            None,
            "Designing for discovery, trust, and modern flexibility. Creating WOFA meant \
             building a platform where design meets real utility. With a focus on hyperlocal \
             discovery, curated spaces, and smooth booking flows, the app makes flexible work \
             feel stylish and efficient.",
        )
        .await?;

        insert_section(
            pool,
            wofa,
            2,
            "paragraph",
            Some("Hyperlocal search meets seamless UX"),
            "How do you make flexible workspaces discoverable, trustworthy, and easy to book \
             for India's startup generation? The challenge was creating a professional-grade \
             experience without sacrificing simplicity.",
        )
        .await?;

        let features = insert_section(
            pool,
            wofa,
            3,
            "features",
            Some("Key features"),
            "Key features that make WOFA stand out",
        )
        .await?;
        let feature_rows: &[(i32, &str, &str, &str)] = &[
            (
                1,
                "Hyperlocal Discovery",
                "Find coworking spaces, cafés, and meeting rooms based on real-time location and preferences.",
                "📍",
            ),
            (
                2,
                "Instant Booking",
                "Book by the hour or day with verified spaces and trusted reviews.",
                "⚡️",
            ),
            (
                3,
                "Curated Spaces",
                "Only the best, most reliable spaces make it into our platform.",
                "🏆",
            ),
        ];
        for (order, title, description, icon) in feature_rows {
            sqlx::query(
                r#"
                INSERT INTO section_features (section_id, "order", title, description, icon_text)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(features)
            .bind(order)
            .bind(title)
            .bind(description)
            .bind(icon)
            .execute(pool)
            .await?;
        }

        let metrics = insert_section(
            pool,
            wofa,
            4,
            "metrics",
            Some("Impact & Results"),
            "Impact & Results",
        )
        .await?;
        let metric_rows: &[(i32, &str, &str)] = &[
            (1, "1000+", "Active Users"),
            (2, "95%", "Satisfaction Rate"),
            (3, "200+", "Spaces Listed"),
        ];
        for (order, value, label) in metric_rows {
            sqlx::query(
                r#"
                INSERT INTO section_metrics (section_id, "order", value, label)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(metrics)
            .bind(order)
            .bind(value)
            .bind(label)
            .execute(pool)
            .await?;
        }
    }

    if let Some(kirana) = insert_project(
        pool,
        "kirana-connect",
        "Kirana Connect",
        "A comprehensive e-commerce platform connecting local kirana stores with customers, \
         featuring real-time inventory management and seamless ordering.",
        "E-commerce, Retail Tech",
    )
    .await?
    {
        insert_section(
            pool,
            kirana,
            1,
            "paragraph",
            None,
            "Bridging the gap between traditional kirana stores and modern e-commerce. Kirana \
             Connect empowers local retailers with digital tools while providing customers \
             with convenient access to neighborhood stores.",
        )
        .await?;
        insert_section(
            pool,
            kirana,
            2,
            "paragraph",
            Some("Digitizing Traditional Retail"),
            "Local kirana stores were losing customers to large e-commerce platforms. Our \
             solution needed to digitize these traditional stores while maintaining their \
             personal touch and community connection.",
        )
        .await?;
    }

    if let Some(mvp) = insert_project(
        pool,
        "startup-mvp",
        "Startup MVP Platform",
        "A rapid prototyping platform that helps startups build and validate their MVPs with \
         integrated user feedback and analytics.",
        "SaaS, Startup Tools",
    )
    .await?
    {
        insert_section(
            pool,
            mvp,
            1,
            "paragraph",
            None,
            "From idea to validation in weeks, not months. Our MVP platform provides startups \
             with the tools they need to build, test, and iterate quickly.",
        )
        .await?;
    }

    let blog_posts: &[(&str, &str, &str, &str, &str)] = &[
        (
            "Designing for Discovery",
            "designing-for-discovery",
            "How we approached hyperlocal search UX for flexible workspaces.",
            "<p>Discovery is the heart of any marketplace. For WOFA we started from the map, \
             not the list, and let real-time location drive every screen.</p>",
            "5 min read",
        ),
        (
            "Shipping an MVP Without Shortcuts",
            "shipping-an-mvp-without-shortcuts",
            "Lessons from building validation-ready products in weeks.",
            "<p>An MVP is not a worse product; it is a smaller promise, kept properly. Here is \
             the process we use to scope one.</p>",
            "4 min read",
        ),
    ];
    for (title, slug, excerpt, content, read_time) in blog_posts {
        let exists: Option<(i64,)> = sqlx::query_as("SELECT id FROM blog_posts WHERE slug = $1")
            .bind(slug)
            .fetch_optional(pool)
            .await?;
        if exists.is_some() {
            tracing::info!(slug = slug, "blog post already present, skipping");
            continue;
        }
        sqlx::query(
            r#"
            INSERT INTO blog_posts (title, slug, excerpt, content, tags, estimated_read_time)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(title)
        .bind(slug)
        .bind(excerpt)
        .bind(content)
        .bind("design,process")
        .bind(read_time)
        .execute(pool)
        .await?;
    }

    Ok(())
}
