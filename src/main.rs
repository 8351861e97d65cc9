use anyhow::Context;
use clap::Parser;
use sercop_dash::report::{export, render};
use sercop_dash::utils::{logger, validation::Validate};
use sercop_dash::{
    CliConfig, DashboardEngine, DashboardError, FilteredView, HistoricalView, SercopClient,
    CONTRACT_TYPES, PROVINCES, YEAR_MAX, YEAR_MIN,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    logger::init(config.verbose);

    tracing::info!("Starting sercop-dash");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if config.list_filters {
        print_filter_vocabulary();
        return Ok(());
    }

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    let filters = match config.filter_selection() {
        Ok(filters) => filters,
        Err(e) => {
            tracing::error!("Configuration validation failed: {}", e);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let client = SercopClient::new(&config.base_url).context("initializing the API client")?;
    let engine = DashboardEngine::new(client, config.preview_rows).with_progress(!config.verbose);

    println!("Contratación Pública de Ecuador");
    println!("{}", render::selection_line(&filters));
    println!();

    let mut rendered_sections = 0;

    let filtered_view = match engine.filtered_section(&filters).await {
        Ok(view) => {
            print_filtered_section(&view);
            rendered_sections += 1;
            Some(view)
        }
        Err(DashboardError::EmptyResult) => {
            println!("No hay datos para los filtros seleccionados.");
            println!();
            rendered_sections += 1;
            None
        }
        Err(e) => {
            tracing::error!("Filtered section failed: {}", e);
            eprintln!("Error al cargar los datos desde la API.");
            None
        }
    };

    let historical_view = if config.no_historical {
        None
    } else {
        match engine.historical_section().await {
            Ok(view) => {
                print_historical_section(&view);
                rendered_sections += 1;
                Some(view)
            }
            Err(e) => {
                tracing::error!("Historical section failed: {}", e);
                eprintln!("No se pudieron obtener datos históricos.");
                None
            }
        }
    };

    if let Some(dir) = &config.export_dir {
        let dir = std::path::Path::new(dir);
        match export::export_views(dir, &filters, filtered_view.as_ref(), historical_view.as_ref())
        {
            Ok(written) => {
                tracing::info!("Exported {} files to {}", written.len(), dir.display());
                println!("(Tablas exportadas a {})", dir.display());
            }
            Err(e) => {
                tracing::warn!("Export failed: {}", e);
                eprintln!("Error al exportar: {}", e);
            }
        }
    }

    if rendered_sections == 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn print_filtered_section(view: &FilteredView) {
    println!("Datos cargados automáticamente. ({} procedimientos)", view.total);
    println!();
    println!("Vista previa:");
    println!("{}", render::preview_table(&view.preview));
    println!();

    if let Some(table) = &view.by_month {
        println!("### Procedimientos por Mes");
        println!("{}", render::frequency_table("Mes", table));
        println!();
    }
    if let Some(table) = &view.by_type {
        println!("### Procedimientos por Tipo de Contratación");
        println!("{}", render::frequency_table("Tipo", table));
        println!();
    }
    if let Some(table) = &view.by_state {
        println!("### Procedimientos por Estado");
        println!("{}", render::frequency_table("Estado", table));
        println!();
    }
}

fn print_historical_section(view: &HistoricalView) {
    println!("### Procedimientos por Año ({}-{})", YEAR_MIN, YEAR_MAX);
    println!("{}", render::yearly_table(&view.series));
    if !view.failed_years.is_empty() {
        let years: Vec<String> = view.failed_years.iter().map(u16::to_string).collect();
        println!("(Sin datos de los años: {})", years.join(", "));
    }
    println!();
}

fn print_filter_vocabulary() {
    println!("Provincias:");
    for province in PROVINCES {
        println!("  {}", province);
    }
    println!();
    println!("Tipos de contratación:");
    for contract_type in CONTRACT_TYPES {
        println!("  {}", contract_type);
    }
}
