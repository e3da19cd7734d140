//! SVG charts for the reports.
//!
//! Charts are drawn with `plotters` on its SVG backend, which needs no
//! system fonts. Category axes (years, authors, countries) use `f64`
//! coordinates with one unit per category and a formatter that maps the
//! integer positions back to labels.

use crate::aggregate::GroupKey;
use crate::report::{
    CitationsReport, ContributorSection, RankingReport, Report, Series, VolumeReport,
};
use crate::{AnalysisError, Category, Result};
use log::info;
use plotters::prelude::*;
use plotters::style::FontTransform;
use std::error::Error;
use std::ops::Range;
use std::path::{Path, PathBuf};

type DrawResult<T> = std::result::Result<T, Box<dyn Error>>;

const SIZE: (u32, u32) = (1400, 800);
const GENERAL_COLOR: RGBColor = RGBColor(31, 119, 180);
const AGRICULTURE_COLOR: RGBColor = RGBColor(44, 160, 44);
const NON_AGRICULTURE_COLOR: RGBColor = RGBColor(255, 127, 14);
const MARKER_COLOR: RGBColor = RGBColor(214, 39, 40);

fn series_color(series: Series) -> RGBColor {
    match series {
        Series::General => GENERAL_COLOR,
        Series::Agriculture => AGRICULTURE_COLOR,
        Series::NonAgriculture => NON_AGRICULTURE_COLOR,
    }
}

fn category_color(category: Category) -> RGBColor {
    match category {
        Category::Agriculture => AGRICULTURE_COLOR,
        Category::NonAgriculture => NON_AGRICULTURE_COLOR,
    }
}

/// Label for an integer axis position, empty between categories.
fn index_label(labels: &[String], position: f64) -> String {
    let index = position.round();
    if (position - index).abs() > 1e-6 || index < 0.0 {
        return String::new();
    }
    labels.get(index as usize).cloned().unwrap_or_default()
}

/// One unit per category, centred on the integers; never empty.
fn category_range(count: usize) -> Range<f64> {
    -0.5..count.max(1) as f64 - 0.5
}

fn upper_bound(values: impl Iterator<Item = f64>) -> f64 {
    values.fold(1.0_f64, f64::max) * 1.1
}

fn render<F>(path: &Path, draw: F) -> Result<PathBuf>
where
    F: FnOnce(&Path) -> DrawResult<()>,
{
    draw(path).map_err(|err| AnalysisError::Render {
        path: path.display().to_string(),
        message: err.to_string(),
    })?;
    info!("Chart saved to {}", path.display());
    Ok(path.to_path_buf())
}

/// Publication counts per year with a least-squares trend line per series.
pub fn volume_chart(report: &VolumeReport, path: &Path) -> Result<PathBuf> {
    render(path, |path| {
        let labels: Vec<String> = report.years.iter().map(|y| y.year.to_string()).collect();
        let max = upper_bound(report.years.iter().map(|y| y.publications.total as f64));

        let root = SVGBackend::new(path, SIZE).into_drawing_area();
        root.fill(&WHITE)?;
        let mut chart = ChartBuilder::on(&root)
            .caption("Publications per Year", ("sans-serif", 28))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(60)
            .build_cartesian_2d(category_range(labels.len()), 0.0..max)?;
        let formatter = |x: &f64| index_label(&labels, *x);
        chart
            .configure_mesh()
            .x_labels(labels.len().max(1))
            .x_label_formatter(&formatter)
            .x_desc("Year")
            .y_desc("Number of Publications")
            .draw()?;

        for series in Series::ALL {
            let color = series_color(series);
            let points: Vec<(f64, f64)> = report
                .counts(series)
                .into_iter()
                .enumerate()
                .map(|(i, count)| (i as f64, count as f64))
                .collect();
            chart
                .draw_series(LineSeries::new(points.clone(), color.stroke_width(2)))?
                .label(series.label())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
            chart.draw_series(points.iter().map(|&p| Circle::new(p, 4, color.filled())))?;

            if let (Some(trend), Some(first)) =
                (series.pick(&report.trends).trend, report.years.first())
            {
                let faded = color.mix(0.5);
                let last = labels.len() as f64 - 1.0;
                let offset = f64::from(first.year);
                let line = vec![
                    (0.0, trend.at(offset).max(0.0)),
                    (last, trend.at(offset + last).max(0.0)),
                ];
                chart
                    .draw_series(LineSeries::new(line, faded.stroke_width(1)))?
                    .label(format!("{} trend", series.label()))
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], faded));
            }
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
        root.present()?;
        Ok(())
    })
}

/// Mean citations per year, with the explained peaks circled.
pub fn citations_chart(report: &CitationsReport, path: &Path) -> Result<PathBuf> {
    render(path, |path| {
        let labels: Vec<String> = report.years.iter().map(|y| y.year.to_string()).collect();
        let max = upper_bound(Series::ALL.iter().flat_map(|&series| report.means(series)));

        let root = SVGBackend::new(path, SIZE).into_drawing_area();
        root.fill(&WHITE)?;
        let mut chart = ChartBuilder::on(&root)
            .caption("Average Citations per Year", ("sans-serif", 28))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(60)
            .build_cartesian_2d(category_range(labels.len()), 0.0..max)?;
        let formatter = |x: &f64| index_label(&labels, *x);
        chart
            .configure_mesh()
            .x_labels(labels.len().max(1))
            .x_label_formatter(&formatter)
            .x_desc("Year")
            .y_desc("Average Citations")
            .draw()?;

        for series in Series::ALL {
            let color = series_color(series);
            let points: Vec<(f64, f64)> = report
                .means(series)
                .into_iter()
                .enumerate()
                .map(|(i, mean)| (i as f64, mean))
                .collect();
            chart
                .draw_series(LineSeries::new(points.clone(), color.stroke_width(2)))?
                .label(format!("Avg Citations {}", series.label()))
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
            chart.draw_series(points.iter().map(|&p| Circle::new(p, 4, color.filled())))?;

            let peaks = report
                .peaks
                .iter()
                .filter(|peak| peak.series == series)
                .filter_map(|peak| report.years.iter().position(|y| y.year == peak.year))
                .map(|i| Circle::new(points[i], 9, color.stroke_width(2)));
            chart.draw_series(peaks)?;
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
        root.present()?;
        Ok(())
    })
}

/// One group of side-by-side bars.
struct BarGroup {
    label: String,
    values: Vec<f64>,
    marker: Option<f64>,
}

/// Layout of a grouped bar chart.
struct BarChart<'a> {
    title: &'a str,
    value_desc: &'a str,
    series: Vec<(String, RGBColor)>,
    groups: Vec<BarGroup>,
    marker_label: Option<&'a str>,
    horizontal: bool,
}

const GROUP_WIDTH: f64 = 0.8;

impl BarChart<'_> {
    /// `(start, end)` of bar `series` within group `index`, along the category axis.
    fn slot(&self, index: usize, series: usize) -> (f64, f64) {
        let width = GROUP_WIDTH / self.series.len().max(1) as f64;
        let start = index as f64 - GROUP_WIDTH / 2.0 + width * series as f64;
        (start, start + width)
    }

    /// Category axis position of group `index`; horizontal charts list the first group on top.
    fn position(&self, index: usize) -> usize {
        if self.horizontal {
            self.groups.len() - 1 - index
        } else {
            index
        }
    }

    /// Maps a (category, value) pair to chart coordinates.
    fn point(&self, category: f64, value: f64) -> (f64, f64) {
        if self.horizontal {
            (value, category)
        } else {
            (category, value)
        }
    }

    fn draw(&self, path: &Path) -> DrawResult<()> {
        let max = upper_bound(
            self.groups
                .iter()
                .flat_map(|g| g.values.iter().copied().chain(g.marker)),
        );
        let mut labels = vec![String::new(); self.groups.len()];
        for (index, group) in self.groups.iter().enumerate() {
            labels[self.position(index)] = group.label.clone();
        }
        let categories = category_range(self.groups.len());

        let root = SVGBackend::new(path, SIZE).into_drawing_area();
        root.fill(&WHITE)?;
        let mut builder = ChartBuilder::on(&root);
        builder.caption(self.title, ("sans-serif", 28)).margin(20);
        let (x_range, y_range) = if self.horizontal {
            builder.x_label_area_size(50).y_label_area_size(320);
            (0.0..max, categories)
        } else {
            builder.x_label_area_size(200).y_label_area_size(60);
            (categories, 0.0..max)
        };
        let mut chart = builder.build_cartesian_2d(x_range, y_range)?;

        let formatter = |v: &f64| index_label(&labels, *v);
        let mut mesh = chart.configure_mesh();
        if self.horizontal {
            mesh.y_labels(labels.len().max(1))
                .y_label_formatter(&formatter)
                .x_desc(self.value_desc)
                .disable_y_mesh();
        } else {
            mesh.x_labels(labels.len().max(1))
                .x_label_formatter(&formatter)
                .x_label_style(
                    ("sans-serif", 13)
                        .into_font()
                        .transform(FontTransform::Rotate90),
                )
                .y_desc(self.value_desc)
                .disable_x_mesh();
        }
        mesh.draw()?;

        for (series_index, (name, color)) in self.series.iter().enumerate() {
            let color = *color;
            let bars = self.groups.iter().enumerate().map(|(index, group)| {
                let (start, end) = self.slot(self.position(index), series_index);
                let value = group.values.get(series_index).copied().unwrap_or_default();
                Rectangle::new(
                    [self.point(start, 0.0), self.point(end, value)],
                    color.filled(),
                )
            });
            chart
                .draw_series(bars)?
                .label(name.as_str())
                .legend(move |(x, y)| {
                    Rectangle::new([(x, y - 5), (x + 12, y + 5)], color.filled())
                });
        }

        if let Some(marker_label) = self.marker_label {
            let markers = self.groups.iter().enumerate().filter_map(|(index, group)| {
                group.marker.map(|value| {
                    Circle::new(
                        self.point(self.position(index) as f64, value),
                        6,
                        MARKER_COLOR.filled(),
                    )
                })
            });
            chart
                .draw_series(markers)?
                .label(marker_label)
                .legend(|(x, y)| Circle::new((x + 6, y), 5, MARKER_COLOR.filled()));
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
        root.present()?;
        Ok(())
    }
}

fn category_series() -> Vec<(String, RGBColor)> {
    [Category::Agriculture, Category::NonAgriculture]
        .into_iter()
        .map(|c| (format!("{} Publications", c.label()), category_color(c)))
        .collect()
}

/// Publications per category for each ranked group, with the total H-index as a marker.
pub fn ranking_chart(
    report: &RankingReport,
    title: &str,
    horizontal: bool,
    path: &Path,
) -> Result<PathBuf> {
    let chart = BarChart {
        title,
        value_desc: "Number of Publications",
        series: category_series(),
        groups: report
            .entries
            .iter()
            .map(|entry| BarGroup {
                label: entry.label.clone(),
                values: vec![
                    entry.stats.publications.agric as f64,
                    entry.stats.publications.non_agric as f64,
                ],
                marker: Some(f64::from(entry.stats.h_index.total)),
            })
            .collect(),
        marker_label: Some("H-index"),
        horizontal,
    };
    render(path, |path| chart.draw(path))
}

/// Citations per category for each ranked group.
pub fn citations_ranking_chart(
    report: &RankingReport,
    title: &str,
    path: &Path,
) -> Result<PathBuf> {
    let chart = BarChart {
        title,
        value_desc: "Number of Citations",
        series: [Category::Agriculture, Category::NonAgriculture]
            .into_iter()
            .map(|c| (format!("{} Citations", c.label()), category_color(c)))
            .collect(),
        groups: report
            .entries
            .iter()
            .map(|entry| BarGroup {
                label: entry.label.clone(),
                values: vec![
                    entry.stats.citations.agric as f64,
                    entry.stats.citations.non_agric as f64,
                ],
                marker: None,
            })
            .collect(),
        marker_label: None,
        horizontal: true,
    };
    render(path, |path| chart.draw(path))
}

/// Leading contributors of one category.
pub fn contributors_chart(section: &ContributorSection, path: &Path) -> Result<PathBuf> {
    let title = format!(
        "Top {} Contributors in {}",
        key_title(section.key),
        section.category.label()
    );
    let chart = BarChart {
        title: &title,
        value_desc: "Number of Publications",
        series: vec![(
            format!("{} Publications", section.category.label()),
            category_color(section.category),
        )],
        groups: section
            .entries
            .iter()
            .map(|(label, count)| BarGroup {
                label: label.clone(),
                values: vec![*count as f64],
                marker: None,
            })
            .collect(),
        marker_label: None,
        horizontal: true,
    };
    render(path, |path| chart.draw(path))
}

fn key_title(key: GroupKey) -> &'static str {
    match key {
        GroupKey::Year => "Year",
        GroupKey::Author => "Author",
        GroupKey::Country => "Country",
        GroupKey::Source => "Source",
    }
}

fn file_stem(key: GroupKey, category: Category) -> String {
    let key = match key {
        GroupKey::Year => "years",
        GroupKey::Author => "authors",
        GroupKey::Country => "countries",
        GroupKey::Source => "sources",
    };
    let category = match category {
        Category::Agriculture => "agriculture",
        Category::NonAgriculture => "non_agriculture",
    };
    format!("top_{key}_{category}")
}

/// Renders every chart of a report into `output_dir`, returning the written paths.
pub fn render_all(report: &Report, output_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut written = vec![
        volume_chart(
            &report.volume,
            &output_dir.join("publications_per_year.svg"),
        )?,
        citations_chart(
            &report.citations,
            &output_dir.join("average_citations_per_year.svg"),
        )?,
        ranking_chart(
            &report.authors,
            "Top Authors by Publications with H-index",
            false,
            &output_dir.join("top_authors.svg"),
        )?,
        ranking_chart(
            &report.sources,
            "Top Sources by Publications with H-index",
            true,
            &output_dir.join("top_sources.svg"),
        )?,
        ranking_chart(
            &report.countries,
            "Top Countries by Publications with H-index",
            false,
            &output_dir.join("top_countries.svg"),
        )?,
        citations_ranking_chart(
            &report.country_citations,
            "Top Countries by Citations",
            &output_dir.join("top_countries_citations.svg"),
        )?,
    ];
    for section in &report.contributors.sections {
        let path = output_dir.join(format!("{}.svg", file_stem(section.key, section.category)));
        written.push(contributors_chart(section, &path)?);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisConfig;
    use crate::csv::CsvLoader;
    use crate::report::analyze;
    use nanoid::nanoid;
    use pretty_assertions::assert_eq;
    use std::fs;

    fn sample_report() -> Report {
        let input = "\
Authors,Title,Year,Source title,Cited by,Affiliations,Abstract,Author Keywords,Index Keywords
Smith J.; Doe A.,Precision farming drones,2018,Sensors,12,\"Univ. of Nairobi, Nairobi, Kenya\",,Drones,
Smith J.,Edge caching,2019,IEEE Access,30,\"KTH, Stockholm, Sweden\",,Edge,
Roe B.,Smart agriculture,2020,Sensors,4,\"Makerere Univ., Kampala, Uganda\",,IoT,
Doe A.,Crop monitoring with LoRa,2020,IEEE Access,7,\"KTH, Stockholm, Sweden\",,LoRa,";
        let table = CsvLoader::new().parse(input).unwrap();
        analyze(table, &AnalysisConfig::default()).unwrap()
    }

    #[test]
    fn test_index_label() {
        let labels = vec!["2019".to_string(), "2020".to_string()];
        assert_eq!(index_label(&labels, 1.0), "2020");
        assert_eq!(index_label(&labels, 0.5), "");
        assert_eq!(index_label(&labels, -1.0), "");
        assert_eq!(index_label(&labels, 5.0), "");
    }

    #[test]
    fn test_render_all_writes_svg_files() {
        let dir = std::env::temp_dir().join(format!("agribib-charts-{}", nanoid!()));
        fs::create_dir_all(&dir).unwrap();

        let written = render_all(&sample_report(), &dir).unwrap();
        assert_eq!(written.len(), 12);
        for path in &written {
            let content = fs::read_to_string(path).unwrap();
            assert!(content.contains("<svg"), "{} is not an SVG", path.display());
        }

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_empty_report_still_renders() {
        let header = "Authors,Title,Year,Source title,Cited by,Affiliations,Abstract,\
                      Author Keywords,Index Keywords\n";
        let table = CsvLoader::new().parse(header).unwrap();
        let report = analyze(table, &AnalysisConfig::default()).unwrap();
        let path = std::env::temp_dir().join(format!("agribib-empty-{}.svg", nanoid!()));
        volume_chart(&report.volume, &path).unwrap();
        assert!(path.exists());
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_unwritable_path_is_render_error() {
        let path = std::env::temp_dir()
            .join(format!("agribib-missing-{}", nanoid!()))
            .join("chart.svg");
        let err = volume_chart(&sample_report().volume, &path).unwrap_err();
        assert!(matches!(err, AnalysisError::Render { .. }));
    }
}
