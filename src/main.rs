use anyhow::Result;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};
use dotenvy::dotenv;

use mission_fleet::config::environment::EnvironmentConfig;
use mission_fleet::database::DatabaseConnection;
use mission_fleet::repositories::PgRecordStore;
use mission_fleet::routes::create_router;
use mission_fleet::state::AppState;
use mission_fleet::storage::LocalFileStorage;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let config = EnvironmentConfig::from_env()?;

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    info!("🚐 Mission Fleet - Gestion des missions");
    info!("================================================");
    info!("🌍 Entorno: {}", config.environment);

    // Inicializar base de datos
    let db_connection = match DatabaseConnection::new_default().await {
        Ok(conn) => conn,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    if let Err(e) = db_connection.run_migrations().await {
        error!("❌ Error ejecutando migraciones: {}", e);
        return Err(e);
    }

    // Directorio de adjuntos
    let storage = match LocalFileStorage::new(config.upload_dir.clone()).await {
        Ok(storage) => storage,
        Err(e) => {
            error!("❌ Error preparando el directorio de adjuntos: {}", e);
            return Err(anyhow::anyhow!("Error de almacenamiento: {}", e));
        }
    };
    info!("📁 Adjuntos en {} servidos bajo {}", storage.root().display(), config.uploads_route);

    let store = PgRecordStore::new(db_connection.pool().clone());
    let addr = config.server_url();
    let state = AppState::new(Arc::new(store), Arc::new(storage), config.clone());

    // Crear router de la API
    let app = create_router(state);

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Estado del servidor");
    info!("👤 Empleados:");
    info!("   GET  /api/employees - Listar empleados");
    info!("   POST /api/employees - Crear empleado");
    info!("   GET  /api/employees/:id - Obtener empleado");
    info!("   PUT  /api/employees/:id - Actualizar empleado");
    info!("   DELETE /api/employees/:id - Eliminar empleado");
    info!("   GET  /api/drivers - Listar conductores");
    info!("   GET  /api/drivers/available - Conductores disponibles");
    info!("🚙 Vehículos:");
    info!("   GET  /api/vehicles - Listar vehículos");
    info!("   POST /api/vehicles - Crear vehículo");
    info!("   GET  /api/vehicles/available - Vehículos disponibles");
    info!("   GET  /api/vehicles/:matricule - Obtener vehículo");
    info!("   PUT  /api/vehicles/:matricule - Actualizar vehículo");
    info!("   DELETE /api/vehicles/:matricule - Eliminar vehículo");
    info!("📋 Misiones:");
    info!("   GET  /api/missions - Listar misiones");
    info!("   POST /api/missions - Crear misión (multipart)");
    info!("   GET  /api/missions/:id - Detalle de misión");
    info!("   PUT  /api/missions/:id - Actualizar misión (multipart)");
    info!("   DELETE /api/missions/:id - Eliminar misión");
    info!("   GET  {}/:archivo - Adjuntos", config.uploads_route);
    info!(
        "⚙️ Política de resolución: {:?}, rechazo de solapamientos: {}",
        config.resolution_policy, config.reject_overlapping_assignments
    );

    // Iniciar servidor en background
    let server_handle = tokio::spawn(async move {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                error!("❌ Error del servidor: {}", e);
                e
            })
    });

    // Esperar a que el servidor termine
    if let Err(e) = server_handle.await? {
        error!("❌ Servidor terminó con error: {}", e);
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo instalar el manejador de Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo instalar el manejador de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
