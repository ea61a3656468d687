use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Un visiteur ne peut avoir qu'une visite active par entreprise.
/// Index partiel supporté par PostgreSQL et SQLite.
const ACTIVE_VISIT_INDEX: &str = "CREATE UNIQUE INDEX IF NOT EXISTS ux_visits_active_per_company \
     ON visits (visitor_email, company_name) WHERE check_out_time IS NULL";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Visitors::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Visitors::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Visitors::Name).string().not_null())
                    .col(ColumnDef::new(Visitors::Email).string().not_null())
                    .col(ColumnDef::new(Visitors::Phone).string())
                    .col(ColumnDef::new(Visitors::Designation).string())
                    .col(ColumnDef::new(Visitors::Company).string())
                    .col(ColumnDef::new(Visitors::CompanyTel).string())
                    .col(ColumnDef::new(Visitors::Website).string())
                    .col(ColumnDef::new(Visitors::Address).string())
                    .col(ColumnDef::new(Visitors::Photo).text())
                    .col(ColumnDef::new(Visitors::IdCardPhoto).text())
                    .col(ColumnDef::new(Visitors::IdCardNumber).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Visits::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Visits::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Visits::VisitorId).integer().not_null())
                    .col(ColumnDef::new(Visits::HostId).integer().not_null())
                    .col(ColumnDef::new(Visits::Reason).string())
                    .col(ColumnDef::new(Visits::ItemsCarried).string())
                    .col(ColumnDef::new(Visits::CheckInTime).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Visits::CheckOutTime).timestamp_with_time_zone())
                    .col(ColumnDef::new(Visits::VisitorEmail).string().not_null())
                    .col(ColumnDef::new(Visits::CompanyName).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_visits_visitor_id")
                            .from(Visits::Table, Visits::VisitorId)
                            .to(Visitors::Table, Visitors::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_visits_host_id")
                            .from(Visits::Table, Visits::HostId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_visits_host_id")
                    .table(Visits::Table)
                    .col(Visits::HostId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_visits_check_in_time")
                    .table(Visits::Table)
                    .col(Visits::CheckInTime)
                    .to_owned(),
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(ACTIVE_VISIT_INDEX)
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Visits::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Visitors::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Visitors {
    Table,
    Id,
    Name,
    Email,
    Phone,
    Designation,
    Company,
    CompanyTel,
    Website,
    Address,
    Photo,
    IdCardPhoto,
    IdCardNumber,
}

#[derive(DeriveIden)]
enum Visits {
    Table,
    Id,
    VisitorId,
    HostId,
    Reason,
    ItemsCarried,
    CheckInTime,
    CheckOutTime,
    VisitorEmail,
    CompanyName,
}
