use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240110_000001_create_users_table::Migration),
            Box::new(m20240110_000002_create_categories_table::Migration),
            Box::new(m20240110_000003_create_machines_table::Migration),
            Box::new(m20240110_000004_create_machine_media_tables::Migration),
            Box::new(m20240110_000005_create_attribute_tables::Migration),
            Box::new(m20240110_000006_create_variant_tables::Migration),
            Box::new(m20240110_000007_create_machine_accessories_table::Migration),
            Box::new(m20240110_000008_create_contact_submissions_table::Migration),
            Box::new(m20240110_000009_create_app_settings_table::Migration),
        ]
    }
}

mod m20240110_000001_create_users_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240110_000001_create_users_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Users::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Users::Id).uuid().primary_key().not_null())
                        .col(
                            ColumnDef::new(Users::Email)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                        .col(ColumnDef::new(Users::Name).string().not_null())
                        .col(ColumnDef::new(Users::CreatedAt).timestamp_with_time_zone().not_null())
                        .col(ColumnDef::new(Users::UpdatedAt).timestamp_with_time_zone().not_null())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Users {
        Table,
        Id,
        Email,
        PasswordHash,
        Name,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240110_000002_create_categories_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240110_000002_create_categories_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Categories::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Categories::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Categories::Name).string().not_null())
                        .col(
                            ColumnDef::new(Categories::Slug)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Categories::Description).text().null())
                        .col(ColumnDef::new(Categories::AdminId).uuid().not_null())
                        .col(ColumnDef::new(Categories::CreatedAt).timestamp_with_time_zone().not_null())
                        .col(ColumnDef::new(Categories::UpdatedAt).timestamp_with_time_zone().not_null())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Categories::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Categories {
        Table,
        Id,
        Name,
        Slug,
        Description,
        AdminId,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240110_000003_create_machines_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240110_000003_create_machines_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            // Ownership (admin_id) is an application-level gate and carries
            // no foreign key. Category deletion detaches machines.
            manager
                .create_table(
                    Table::create()
                        .table(Machines::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Machines::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Machines::Name).string().not_null())
                        .col(ColumnDef::new(Machines::Description).text().null())
                        .col(ColumnDef::new(Machines::HeroDescription).text().null())
                        .col(ColumnDef::new(Machines::Power).string().not_null())
                        .col(ColumnDef::new(Machines::DigDepth).string().not_null())
                        .col(ColumnDef::new(Machines::Weight).string().not_null())
                        .col(ColumnDef::new(Machines::BucketCapacity).string().not_null())
                        .col(ColumnDef::new(Machines::Price).string().not_null())
                        .col(
                            ColumnDef::new(Machines::Featured)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(Machines::Visible)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(Machines::CategoryId).uuid().null())
                        .col(ColumnDef::new(Machines::HeroImageId).uuid().null())
                        .col(ColumnDef::new(Machines::AdminId).uuid().not_null())
                        .col(ColumnDef::new(Machines::CreatedAt).timestamp_with_time_zone().not_null())
                        .col(ColumnDef::new(Machines::UpdatedAt).timestamp_with_time_zone().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_machines_category_id")
                                .from(Machines::Table, Machines::CategoryId)
                                .to(Categories::Table, Categories::Id)
                                .on_delete(ForeignKeyAction::SetNull)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_machines_category_id")
                        .table(Machines::Table)
                        .col(Machines::CategoryId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_machines_visible")
                        .table(Machines::Table)
                        .col(Machines::Visible)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Machines::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Machines {
        Table,
        Id,
        Name,
        Description,
        HeroDescription,
        Power,
        DigDepth,
        Weight,
        BucketCapacity,
        Price,
        Featured,
        Visible,
        CategoryId,
        HeroImageId,
        AdminId,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum Categories {
        Table,
        Id,
    }
}

mod m20240110_000004_create_machine_media_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240110_000004_create_machine_media_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(MachineImages::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(MachineImages::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(MachineImages::MachineId).uuid().not_null())
                        .col(ColumnDef::new(MachineImages::Url).string().not_null())
                        .col(
                            ColumnDef::new(MachineImages::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_machine_images_machine_id")
                                .from(MachineImages::Table, MachineImages::MachineId)
                                .to(Machines::Table, Machines::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_machine_images_machine_id")
                        .table(MachineImages::Table)
                        .col(MachineImages::MachineId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(MachineSections::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(MachineSections::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(MachineSections::MachineId).uuid().not_null())
                        .col(ColumnDef::new(MachineSections::Title).string().not_null())
                        .col(ColumnDef::new(MachineSections::Body).text().not_null())
                        .col(
                            ColumnDef::new(MachineSections::SortOrder)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(MachineSections::ImageUrl).string().null())
                        .col(
                            ColumnDef::new(MachineSections::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_machine_sections_machine_id")
                                .from(MachineSections::Table, MachineSections::MachineId)
                                .to(Machines::Table, Machines::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_machine_sections_machine_id")
                        .table(MachineSections::Table)
                        .col(MachineSections::MachineId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(MachineDownloads::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(MachineDownloads::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MachineDownloads::MachineId)
                                .uuid()
                                .not_null(),
                        )
                        .col(ColumnDef::new(MachineDownloads::Label).string().not_null())
                        .col(ColumnDef::new(MachineDownloads::Url).string().not_null())
                        .col(
                            ColumnDef::new(MachineDownloads::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_machine_downloads_machine_id")
                                .from(MachineDownloads::Table, MachineDownloads::MachineId)
                                .to(Machines::Table, Machines::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_machine_downloads_machine_id")
                        .table(MachineDownloads::Table)
                        .col(MachineDownloads::MachineId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(MachineDownloads::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(MachineSections::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(MachineImages::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum MachineImages {
        Table,
        Id,
        MachineId,
        Url,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum MachineSections {
        Table,
        Id,
        MachineId,
        Title,
        Body,
        SortOrder,
        ImageUrl,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum MachineDownloads {
        Table,
        Id,
        MachineId,
        Label,
        Url,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum Machines {
        Table,
        Id,
    }
}

mod m20240110_000005_create_attribute_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240110_000005_create_attribute_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(FeatureDefinitions::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(FeatureDefinitions::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(FeatureDefinitions::CategoryId).uuid().null())
                        .col(ColumnDef::new(FeatureDefinitions::Key).string().not_null())
                        .col(
                            ColumnDef::new(FeatureDefinitions::Label)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(FeatureDefinitions::Kind).string().not_null())
                        .col(ColumnDef::new(FeatureDefinitions::Options).json().null())
                        .col(
                            ColumnDef::new(FeatureDefinitions::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(FeatureDefinitions::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_feature_definitions_category_id")
                                .from(FeatureDefinitions::Table, FeatureDefinitions::CategoryId)
                                .to(Categories::Table, Categories::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            // Key uniqueness per category scope is additionally checked in
            // the service so the NULL (global) scope is covered on
            // PostgreSQL, where NULLs never collide in a unique index.
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_feature_definitions_category_key")
                        .table(FeatureDefinitions::Table)
                        .col(FeatureDefinitions::CategoryId)
                        .col(FeatureDefinitions::Key)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(FeatureValues::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(FeatureValues::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(FeatureValues::MachineId).uuid().not_null())
                        .col(ColumnDef::new(FeatureValues::FeatureId).uuid().not_null())
                        .col(ColumnDef::new(FeatureValues::Value).json().not_null())
                        .col(
                            ColumnDef::new(FeatureValues::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(FeatureValues::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_feature_values_machine_id")
                                .from(FeatureValues::Table, FeatureValues::MachineId)
                                .to(Machines::Table, Machines::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_feature_values_feature_id")
                                .from(FeatureValues::Table, FeatureValues::FeatureId)
                                .to(FeatureDefinitions::Table, FeatureDefinitions::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_feature_values_machine_feature")
                        .table(FeatureValues::Table)
                        .col(FeatureValues::MachineId)
                        .col(FeatureValues::FeatureId)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(ParameterDefinitions::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ParameterDefinitions::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ParameterDefinitions::CategoryId)
                                .uuid()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(ParameterDefinitions::Key)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ParameterDefinitions::Label)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ParameterDefinitions::Kind)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ParameterDefinitions::Options).json().null())
                        .col(
                            ColumnDef::new(ParameterDefinitions::AffectsPrice)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(ParameterDefinitions::PriceModifier)
                                .decimal()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(ParameterDefinitions::PriceModifierType)
                                .string_len(10)
                                .null(),
                        )
                        .col(
                            ColumnDef::new(ParameterDefinitions::IsQuickSpec)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(ParameterDefinitions::QuickSpecOrder)
                                .integer()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(ParameterDefinitions::QuickSpecLabel)
                                .string()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(ParameterDefinitions::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ParameterDefinitions::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_parameter_definitions_category_id")
                                .from(
                                    ParameterDefinitions::Table,
                                    ParameterDefinitions::CategoryId,
                                )
                                .to(Categories::Table, Categories::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_parameter_definitions_category_key")
                        .table(ParameterDefinitions::Table)
                        .col(ParameterDefinitions::CategoryId)
                        .col(ParameterDefinitions::Key)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(ParameterValues::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ParameterValues::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ParameterValues::MachineId).uuid().not_null())
                        .col(
                            ColumnDef::new(ParameterValues::ParameterId)
                                .uuid()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ParameterValues::Value).json().not_null())
                        .col(
                            ColumnDef::new(ParameterValues::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ParameterValues::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_parameter_values_machine_id")
                                .from(ParameterValues::Table, ParameterValues::MachineId)
                                .to(Machines::Table, Machines::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_parameter_values_parameter_id")
                                .from(ParameterValues::Table, ParameterValues::ParameterId)
                                .to(ParameterDefinitions::Table, ParameterDefinitions::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_parameter_values_machine_parameter")
                        .table(ParameterValues::Table)
                        .col(ParameterValues::MachineId)
                        .col(ParameterValues::ParameterId)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ParameterValues::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(ParameterDefinitions::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(FeatureValues::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(FeatureDefinitions::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum FeatureDefinitions {
        Table,
        Id,
        CategoryId,
        Key,
        Label,
        Kind,
        Options,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum FeatureValues {
        Table,
        Id,
        MachineId,
        FeatureId,
        Value,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum ParameterDefinitions {
        Table,
        Id,
        CategoryId,
        Key,
        Label,
        Kind,
        Options,
        AffectsPrice,
        PriceModifier,
        PriceModifierType,
        IsQuickSpec,
        QuickSpecOrder,
        QuickSpecLabel,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum ParameterValues {
        Table,
        Id,
        MachineId,
        ParameterId,
        Value,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum Categories {
        Table,
        Id,
    }

    #[derive(DeriveIden)]
    enum Machines {
        Table,
        Id,
    }
}

mod m20240110_000006_create_variant_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240110_000006_create_variant_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(VariantGroups::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(VariantGroups::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(VariantGroups::MachineId).uuid().not_null())
                        .col(ColumnDef::new(VariantGroups::Name).string().not_null())
                        .col(
                            ColumnDef::new(VariantGroups::SortOrder)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(VariantGroups::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_variant_groups_machine_id")
                                .from(VariantGroups::Table, VariantGroups::MachineId)
                                .to(Machines::Table, Machines::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_variant_groups_machine_id")
                        .table(VariantGroups::Table)
                        .col(VariantGroups::MachineId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(VariantOptions::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(VariantOptions::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(VariantOptions::GroupId).uuid().not_null())
                        .col(ColumnDef::new(VariantOptions::Name).string().not_null())
                        .col(
                            ColumnDef::new(VariantOptions::PriceModifier)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(VariantOptions::IsDefault)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(VariantOptions::ImageUrl).string().null())
                        .col(
                            ColumnDef::new(VariantOptions::ParameterOverrides)
                                .json()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(VariantOptions::SortOrder)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(VariantOptions::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_variant_options_group_id")
                                .from(VariantOptions::Table, VariantOptions::GroupId)
                                .to(VariantGroups::Table, VariantGroups::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_variant_options_group_id")
                        .table(VariantOptions::Table)
                        .col(VariantOptions::GroupId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(VariantOptions::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(VariantGroups::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum VariantGroups {
        Table,
        Id,
        MachineId,
        Name,
        SortOrder,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum VariantOptions {
        Table,
        Id,
        GroupId,
        Name,
        PriceModifier,
        IsDefault,
        ImageUrl,
        ParameterOverrides,
        SortOrder,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum Machines {
        Table,
        Id,
    }
}

mod m20240110_000007_create_machine_accessories_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240110_000007_create_machine_accessories_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(MachineAccessories::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(MachineAccessories::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MachineAccessories::ParentMachineId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MachineAccessories::AccessoryMachineId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MachineAccessories::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_machine_accessories_parent")
                                .from(
                                    MachineAccessories::Table,
                                    MachineAccessories::ParentMachineId,
                                )
                                .to(Machines::Table, Machines::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_machine_accessories_accessory")
                                .from(
                                    MachineAccessories::Table,
                                    MachineAccessories::AccessoryMachineId,
                                )
                                .to(Machines::Table, Machines::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_machine_accessories_pair")
                        .table(MachineAccessories::Table)
                        .col(MachineAccessories::ParentMachineId)
                        .col(MachineAccessories::AccessoryMachineId)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_machine_accessories_accessory_id")
                        .table(MachineAccessories::Table)
                        .col(MachineAccessories::AccessoryMachineId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(MachineAccessories::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum MachineAccessories {
        Table,
        Id,
        ParentMachineId,
        AccessoryMachineId,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum Machines {
        Table,
        Id,
    }
}

mod m20240110_000008_create_contact_submissions_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240110_000008_create_contact_submissions_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(ContactSubmissions::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ContactSubmissions::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ContactSubmissions::Name).string().not_null())
                        .col(
                            ColumnDef::new(ContactSubmissions::Email)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ContactSubmissions::Phone).string().null())
                        .col(
                            ColumnDef::new(ContactSubmissions::Message)
                                .text()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ContactSubmissions::Read)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(ContactSubmissions::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_contact_submissions_created_at")
                        .table(ContactSubmissions::Table)
                        .col(ContactSubmissions::CreatedAt)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ContactSubmissions::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum ContactSubmissions {
        Table,
        Id,
        Name,
        Email,
        Phone,
        Message,
        Read,
        CreatedAt,
    }
}

mod m20240110_000009_create_app_settings_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240110_000009_create_app_settings_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(AppSettings::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(AppSettings::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(AppSettings::Key)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(AppSettings::Value).text().not_null())
                        .col(
                            ColumnDef::new(AppSettings::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(AppSettings::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum AppSettings {
        Table,
        Id,
        Key,
        Value,
        UpdatedAt,
    }
}
