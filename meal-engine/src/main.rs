use meal_engine::{EngineState, print_banner, seed, setup_environment};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Environment (.env, work dir, logging) and configuration
    let config = setup_environment()?;

    print_banner();
    tracing::info!(
        environment = %config.environment,
        database = %config.database_path,
        "Meal engine starting..."
    );

    // 2. Database, migrations and services
    let state = EngineState::initialize(&config).await?;

    // 3. Demo data for empty databases
    if config.seed_demo_data
        && let Some(report) = seed::seed_demo_data(&state).await?
    {
        tracing::info!(
            "Seeded {} departments, {} users, {} dishes",
            report.departments,
            report.users,
            report.dishes
        );
    }

    // 4. Summary
    let summary = state.reports.summary().await?;
    tracing::info!(
        orders = summary.total_orders,
        dishes = summary.total_dishes,
        departments = summary.active_departments,
        revenue = %summary.revenue,
        "Meal engine ready"
    );

    state.pool.close().await;
    Ok(())
}
