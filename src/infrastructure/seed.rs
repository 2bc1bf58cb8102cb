//! Demo catalog written on first start when `SEED_DEMO` is set.

use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};

use crate::domain::{
    ComponentRepository, CreateComponentInput, CreateKitInput, DomainError, KitMemberInput,
    KitRepository,
};
use crate::infrastructure::{SeaOrmComponentRepository, SeaOrmKitRepository};
use crate::models::component::Entity as ComponentEntity;

/// (name, serial number, category)
const DEMO_COMPONENTS: [(&str, &str, &str); 6] = [
    ("Resistencia 1kΩ", "RES-1K-001", "passive"),
    ("LED Rojo 5mm", "LED-R5-001", "optoelectronics"),
    ("Cable Ethernet", "ETH-CAB-001", "networking"),
    ("Switch 8 Puertos", "SW8-001", "networking"),
    ("Raspberry Pi 4", "RPI4-001", "boards"),
    ("Teclado USB", "KBD-USB-001", "peripherals"),
];

/// (name, description, kit code, [(component index, quantity)])
const DEMO_KITS: [(&str, &str, &str, &[(usize, i32)]); 3] = [
    (
        "Kit de Electrónica Básico",
        "Kit con componentes básicos para proyectos electrónicos",
        "KIT-ELEC-01",
        &[(0, 5), (1, 3)],
    ),
    (
        "Kit de Redes",
        "Kit para prácticas de redes",
        "KIT-NET-01",
        &[(2, 2), (3, 1)],
    ),
    (
        "Kit de Programación",
        "Kit para actividades de programación",
        "KIT-PROG-01",
        &[(4, 1), (5, 1)],
    ),
];

/// Seed the demo catalog. Does nothing if any component row exists.
pub async fn seed_demo_data(db: &DatabaseConnection) -> Result<(), DomainError> {
    if ComponentEntity::find().count(db).await? > 0 {
        tracing::info!("Catalog already populated, skipping demo seed");
        return Ok(());
    }

    let components = SeaOrmComponentRepository::new(db.clone());
    let kits = SeaOrmKitRepository::new(db.clone());

    let mut ids = Vec::with_capacity(DEMO_COMPONENTS.len());
    for (name, serial_number, category) in DEMO_COMPONENTS {
        let component = components
            .create(CreateComponentInput {
                name: name.to_owned(),
                serial_number: serial_number.to_owned(),
                description: None,
                category: Some(category.to_owned()),
            })
            .await?;
        ids.push(component.id);
    }

    for (name, description, kit_code, members) in DEMO_KITS {
        kits.create(CreateKitInput {
            name: name.to_owned(),
            description: Some(description.to_owned()),
            kit_code: kit_code.to_owned(),
            components: members
                .iter()
                .map(|&(index, quantity)| KitMemberInput {
                    component_id: ids[index],
                    quantity,
                })
                .collect(),
        })
        .await?;
    }

    tracing::info!(
        "Seeded {} components and {} kits",
        DEMO_COMPONENTS.len(),
        DEMO_KITS.len()
    );
    Ok(())
}
