// Dashboard service - Use case for building the inventory dashboard
use crate::application::table_cache::TableCache;
use crate::domain::chart::BarChart;
use crate::domain::dashboard::{Dashboard, DashboardLabels, Notice, Section, SectionBody, SectionId};
use crate::domain::error::LoadError;
use crate::domain::stages::{
    category_counts, column_subset, compute_kpis, distinct_categories, filter_by_category,
    line_chart, resolve_metrics, PriceMetric,
};
use crate::domain::table::Table;
use std::path::PathBuf;
use std::sync::Arc;

const EMPTY_SELECTION_PROMPT: &str = "Selecciona al menos una columna para visualizar el gráfico.";
const X_LABEL_ROTATION: i32 = 45;

/// Current state of the dashboard controls. `None` selects the default.
#[derive(Debug, Clone, Default)]
pub struct DashboardControls {
    pub metrics: Option<Vec<String>>,
    pub category: Option<String>,
}

#[derive(Clone)]
pub struct DashboardService {
    cache: TableCache,
    data_path: PathBuf,
    labels: Arc<DashboardLabels>,
}

impl DashboardService {
    pub fn new(cache: TableCache, data_path: PathBuf, labels: DashboardLabels) -> Self {
        Self {
            cache,
            data_path,
            labels: Arc::new(labels),
        }
    }

    pub fn labels(&self) -> &DashboardLabels {
        &self.labels
    }

    /// Loaded table, through the cache
    pub async fn table(&self) -> Result<Arc<Table>, LoadError> {
        self.cache.get(&self.data_path).await.map_err(|e| {
            tracing::error!("Error loading {}: {}", self.data_path.display(), e);
            e
        })
    }

    pub async fn build(&self, controls: &DashboardControls) -> Result<Dashboard, LoadError> {
        let table = self.table().await?;
        let sections = SectionId::ORDER
            .iter()
            .map(|&id| self.build_section(id, &table, controls))
            .collect();
        Ok(Dashboard::new(self.labels.title.clone(), sections))
    }

    pub async fn categories(&self) -> Result<Option<Vec<String>>, LoadError> {
        let table = self.table().await?;
        Ok(distinct_categories(&table))
    }

    /// Run one presenter stage. Stages never fail; missing data becomes a notice.
    pub fn build_section(
        &self,
        id: SectionId,
        table: &Table,
        controls: &DashboardControls,
    ) -> Section {
        let section = Section::new(id, self.labels.heading(id).to_string());
        match id {
            SectionId::FullTable => section.with_body(SectionBody::Table {
                table: table.clone(),
            }),
            SectionId::ColumnSubset => match column_subset(table) {
                Ok(subset) => section.with_body(SectionBody::Table { table: subset }),
                Err(e) => section.with_notice(Notice::error(e.to_string())),
            },
            SectionId::PriceChart => self.price_chart_section(section, table, controls),
            SectionId::CategoryFilter => self.category_filter_section(section, table, controls),
            SectionId::CategoryDistribution => match category_counts(table) {
                Some(bars) => section.with_body(SectionBody::BarChart {
                    chart: BarChart {
                        title: self.labels.bar_chart_title.clone(),
                        x_label: self.labels.bar_chart_x_label.clone(),
                        y_label: self.labels.bar_chart_y_label.clone(),
                        x_label_rotation: X_LABEL_ROTATION,
                        bars,
                    },
                }),
                None => section,
            },
            SectionId::Kpis => {
                let summary = compute_kpis(table);
                let section = if summary.average_price.is_none() {
                    section.with_notice(Notice::info(
                        "No hay precios numéricos para calcular el promedio.",
                    ))
                } else {
                    section
                };
                let lines = summary.lines();
                section.with_body(SectionBody::Kpis { summary, lines })
            }
        }
    }

    fn price_chart_section(
        &self,
        section: Section,
        table: &Table,
        controls: &DashboardControls,
    ) -> Section {
        // Skipped together with the column subset when the schema is incomplete
        if let Err(e) = column_subset(table) {
            return section.with_notice(Notice::error(e.to_string()));
        }

        let selected = match resolve_metrics(controls.metrics.as_deref()) {
            Ok(selected) => selected,
            Err(e) => return section.with_notice(Notice::error(e.to_string())),
        };

        let options = PriceMetric::ALL.to_vec();
        if selected.is_empty() {
            return section
                .with_body(SectionBody::PriceChart {
                    options,
                    selected,
                    chart: None,
                })
                .with_notice(Notice::info(EMPTY_SELECTION_PROMPT));
        }

        let chart = line_chart(table, &selected);
        section.with_body(SectionBody::PriceChart {
            options,
            selected,
            chart: Some(chart),
        })
    }

    fn category_filter_section(
        &self,
        section: Section,
        table: &Table,
        controls: &DashboardControls,
    ) -> Section {
        let Some(options) = distinct_categories(table) else {
            return section.with_notice(Notice::error(
                "La columna 'category' no existe en el dataset.",
            ));
        };

        let selected = controls
            .category
            .clone()
            .or_else(|| options.first().cloned());

        let rows = selected
            .as_deref()
            .and_then(|category| filter_by_category(table, category))
            .unwrap_or_else(|| table.filter_rows(|_| false));

        let section = match &selected {
            Some(category) if !options.contains(category) => section.with_notice(Notice::info(
                format!("La categoría '{}' no aparece en el dataset.", category),
            )),
            _ => section,
        };

        section.with_body(SectionBody::CategoryFilter {
            options,
            selected,
            rows,
        })
    }
}
