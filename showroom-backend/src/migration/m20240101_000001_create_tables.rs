use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Edition::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Edition::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Edition::SiteTitle).string_len(40).not_null())
                    .col(ColumnDef::new(Edition::Country).string_len(2).not_null())
                    .col(ColumnDef::new(Edition::Order).integer().not_null())
                    .col(
                        ColumnDef::new(Edition::ShortDescription)
                            .string_len(40)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Edition::HtmlTitle).string_len(100).not_null())
                    .col(
                        ColumnDef::new(Edition::SiteSubtitle)
                            .string_len(125)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Edition::RssTitle).string_len(100).not_null())
                    .col(
                        ColumnDef::new(Edition::RssDescription)
                            .string_len(200)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Edition::FacebookUrl).string_len(90))
                    .col(
                        ColumnDef::new(Edition::HomeMenuTitle)
                            .string_len(40)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Edition::HomeMenuColor)
                            .string_len(7)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Edition::HomeMenuActiveColor)
                            .string_len(7)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Edition::HomeNumWebsites)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Edition::FooterLeft).string_len(200).not_null())
                    .col(
                        ColumnDef::new(Edition::FooterRight)
                            .string_len(200)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Edition::ContactTitle)
                            .string_len(40)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Edition::ContactHtml).text().not_null())
                    .col(
                        ColumnDef::new(Edition::Comments)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Category::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Category::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Category::Name).string_len(40).not_null())
                    .col(
                        ColumnDef::new(Category::UrlName)
                            .string_len(40)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Category::Order).integer().not_null())
                    .col(ColumnDef::new(Category::Color).string_len(7).not_null())
                    .col(ColumnDef::new(Category::ActiveColor).string_len(7).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Website::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Website::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Website::Title).string_len(50).not_null())
                    .col(ColumnDef::new(Website::CategoryId).uuid().not_null())
                    .col(ColumnDef::new(Website::Order).integer().not_null())
                    .col(ColumnDef::new(Website::Country).string_len(2))
                    .col(ColumnDef::new(Website::Desc).text().not_null())
                    .col(
                        ColumnDef::new(Website::Screenshot)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Website::Url).string_len(90).not_null())
                    .col(
                        ColumnDef::new(Website::PubDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_website_category")
                            .from(Website::Table, Website::CategoryId)
                            .to(Category::Table, Category::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(EditionWebsite::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EditionWebsite::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(EditionWebsite::EditionId).uuid().not_null())
                    .col(ColumnDef::new(EditionWebsite::WebsiteId).uuid().not_null())
                    .col(ColumnDef::new(EditionWebsite::Title).string_len(50))
                    .col(ColumnDef::new(EditionWebsite::Desc).text().not_null())
                    .col(ColumnDef::new(EditionWebsite::Order).integer().not_null())
                    .col(
                        ColumnDef::new(EditionWebsite::PubDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_edition_website_edition")
                            .from(EditionWebsite::Table, EditionWebsite::EditionId)
                            .to(Edition::Table, Edition::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_edition_website_website")
                            .from(EditionWebsite::Table, EditionWebsite::WebsiteId)
                            .to(Website::Table, Website::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EditionWebsite::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Website::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Category::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Edition::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Edition {
    Table,
    Id,
    SiteTitle,
    Country,
    Order,
    ShortDescription,
    HtmlTitle,
    SiteSubtitle,
    RssTitle,
    RssDescription,
    FacebookUrl,
    HomeMenuTitle,
    HomeMenuColor,
    HomeMenuActiveColor,
    HomeNumWebsites,
    FooterLeft,
    FooterRight,
    ContactTitle,
    ContactHtml,
    Comments,
}

#[derive(DeriveIden)]
enum Category {
    Table,
    Id,
    Name,
    UrlName,
    Order,
    Color,
    ActiveColor,
}

#[derive(DeriveIden)]
enum Website {
    Table,
    Id,
    Title,
    CategoryId,
    Order,
    Country,
    Desc,
    Screenshot,
    Url,
    PubDate,
}

#[derive(DeriveIden)]
enum EditionWebsite {
    Table,
    Id,
    EditionId,
    WebsiteId,
    Title,
    Desc,
    Order,
    PubDate,
}
