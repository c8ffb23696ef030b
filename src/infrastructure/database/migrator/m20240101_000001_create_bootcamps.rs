//! Create bootcamps table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Bootcamps::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Bootcamps::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Bootcamps::Name).string_len(50).not_null())
                    .col(ColumnDef::new(Bootcamps::Slug).string().not_null())
                    .col(ColumnDef::new(Bootcamps::Description).string_len(500).not_null())
                    .col(ColumnDef::new(Bootcamps::Website).string())
                    .col(ColumnDef::new(Bootcamps::Phone).string_len(20))
                    .col(ColumnDef::new(Bootcamps::Email).string())
                    .col(ColumnDef::new(Bootcamps::Longitude).double())
                    .col(ColumnDef::new(Bootcamps::Latitude).double())
                    .col(ColumnDef::new(Bootcamps::FormattedAddress).string())
                    .col(ColumnDef::new(Bootcamps::Street).string())
                    .col(ColumnDef::new(Bootcamps::City).string())
                    .col(ColumnDef::new(Bootcamps::State).string())
                    .col(ColumnDef::new(Bootcamps::Zipcode).string())
                    .col(ColumnDef::new(Bootcamps::Country).string())
                    .col(
                        ColumnDef::new(Bootcamps::Careers)
                            .text()
                            .not_null()
                            .default("[]"),
                    )
                    .col(ColumnDef::new(Bootcamps::AverageRating).double())
                    .col(ColumnDef::new(Bootcamps::AverageCost).double())
                    .col(
                        ColumnDef::new(Bootcamps::Photo)
                            .string()
                            .not_null()
                            .default("no-photo.jpg"),
                    )
                    .col(
                        ColumnDef::new(Bootcamps::Housing)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Bootcamps::JobAssistance)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Bootcamps::JobGuarantee)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Bootcamps::AcceptGi)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Bootcamps::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bootcamps_name")
                    .table(Bootcamps::Table)
                    .col(Bootcamps::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bootcamps_latitude")
                    .table(Bootcamps::Table)
                    .col(Bootcamps::Latitude)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bootcamps_longitude")
                    .table(Bootcamps::Table)
                    .col(Bootcamps::Longitude)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bootcamps_created_at")
                    .table(Bootcamps::Table)
                    .col(Bootcamps::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Bootcamps::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Bootcamps {
    Table,
    Id,
    Name,
    Slug,
    Description,
    Website,
    Phone,
    Email,
    Longitude,
    Latitude,
    FormattedAddress,
    Street,
    City,
    State,
    Zipcode,
    Country,
    Careers,
    AverageRating,
    AverageCost,
    Photo,
    Housing,
    JobAssistance,
    JobGuarantee,
    AcceptGi,
    CreatedAt,
}
